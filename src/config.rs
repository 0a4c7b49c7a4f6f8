/// Page-shell presentation options, injected into the app at startup
/// instead of being hard-coded next to the dashboard logic.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub page_title: String,
    pub default_ticker: String,
    pub wide_layout: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_title: "Stock Analytics".to_owned(),
            default_ticker: "AAPL".to_owned(),
            wide_layout: true,
        }
    }
}

impl AppConfig {
    pub fn window_size(&self) -> [f32; 2] {
        if self.wide_layout {
            [1280.0, 860.0]
        } else {
            [960.0, 720.0]
        }
    }

    pub fn min_window_size(&self) -> [f32; 2] {
        [760.0, 560.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_layout_widens_the_window() {
        let wide = AppConfig::default();
        let narrow = AppConfig {
            wide_layout: false,
            ..AppConfig::default()
        };
        assert!(wide.window_size()[0] > narrow.window_size()[0]);
    }
}
