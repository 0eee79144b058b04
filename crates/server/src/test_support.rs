//! Test-only fakes (`test-support` feature), mirroring the teacher's
//! `#[cfg(test)] mod fake` convention generalized to a feature so other
//! crates' integration tests can build an `AppState` without pulling in the
//! real QR-code renderer.

use crate::qrcode::QrCodeEncoder;

pub struct NullQrCodeEncoder;

impl QrCodeEncoder for NullQrCodeEncoder {
    fn encode_data_url(&self, _data: &str) -> Option<String> {
        Some("data:image/png;base64,stub".to_string())
    }
}
