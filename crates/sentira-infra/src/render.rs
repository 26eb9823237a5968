//! Placeholder chart renderer.
//!
//! Real chart drawing is handled by a separate frontend. This renderer
//! satisfies the port with a well-formed 1x1 PNG for every chart kind so
//! report consumers always receive a decodable artifact.

use sentira_core::render::ChartRenderer;
use sentira_types::report::{ChartKind, PeriodReport, RenderedChart};

const PLACEHOLDER_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct PlaceholderChartRenderer;

impl ChartRenderer for PlaceholderChartRenderer {
    fn render(&self, kind: ChartKind, _report: &PeriodReport) -> RenderedChart {
        RenderedChart {
            kind,
            png_base64: PLACEHOLDER_PNG_BASE64.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn test_placeholder_is_decodable_png() {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(PLACEHOLDER_PNG_BASE64)
            .unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
