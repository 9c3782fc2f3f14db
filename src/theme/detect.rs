use super::ThemeVariant;

/// Background luma above which the terminal counts as light.
const LIGHT_LUMA: f32 = 0.6;

/// Guess the terminal background by querying it; falls back to dark.
pub fn detect_terminal_theme() -> ThemeVariant {
    match terminal_light::luma() {
        Ok(luma) => variant_for_luma(luma),
        Err(e) => {
            tracing::debug!(error = %e, "terminal background query failed");
            ThemeVariant::Dark
        }
    }
}

fn variant_for_luma(luma: f32) -> ThemeVariant {
    if luma > LIGHT_LUMA {
        ThemeVariant::Light
    } else {
        ThemeVariant::Dark
    }
}
