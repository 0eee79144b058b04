//! Feed generation: out-of-scope collaborator interface (spec.md §1 "the
//! RSS XML serializer"). The Worker regenerates a user's `feed.xml` after
//! every successful job (spec.md §4.5.2 step 4); this default
//! implementation renders a minimal, valid podcast RSS 2.0 document.

use echocast_core::Episode;

pub trait FeedGenerator: Send + Sync {
    fn render(&self, user_id: &str, episodes: &[Episode]) -> String;
}

pub struct RssFeedGenerator {
    pub base_url: String,
}

impl FeedGenerator for RssFeedGenerator {
    fn render(&self, user_id: &str, episodes: &[Episode]) -> String {
        let mut items = String::new();
        for episode in episodes {
            let audio_url = format!("{}/episodes/{}/{}", self.base_url.trim_end_matches('/'), user_id, episode.audio_file);
            items.push_str(&format!(
                "    <item>\n      <title>{title}</title>\n      <pubDate>{date}</pubDate>\n      <enclosure url=\"{url}\" length=\"{bytes}\" type=\"audio/mpeg\"/>\n      <guid>{id}</guid>\n      <itunes:duration>{duration}</itunes:duration>\n    </item>\n",
                title = xml_escape(&episode.title),
                date = episode.created_at.to_rfc2822(),
                url = xml_escape(&audio_url),
                bytes = episode.size_bytes,
                id = xml_escape(&episode.id),
                duration = episode.duration_seconds.round() as u64,
            ));
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\" xmlns:itunes=\"http://www.itunes.com/dtds/podcast-1.0.dtd\">\n  <channel>\n    <title>Echocast — {user}</title>\n    <description>Narrated articles for {user}</description>\n{items}  </channel>\n</rss>\n",
            user = xml_escape(user_id),
            items = items,
        )
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
