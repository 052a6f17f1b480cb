//! # Output Configuration
//!
//! Decides whether the `parse` report is styled. `--color always|never`
//! wins; `auto` styles only when `NO_COLOR` is unset and `console` reports
//! a color-capable stdout (which covers `CLICOLOR`/`CLICOLOR_FORCE`).

use std::env;

use clap::ValueEnum;
use console::Style;

/// Value of the global `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorWhen {
    Always,
    Never,
    #[default]
    Auto,
}

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    pub fn new(when: ColorWhen) -> Self {
        let use_color = match when {
            ColorWhen::Always => true,
            ColorWhen::Never => false,
            ColorWhen::Auto => env::var_os("NO_COLOR").is_none() && console::colors_enabled(),
        };
        Self { use_color }
    }

    /// Render a `label: value` line, bolding the label when colors are on.
    pub fn field(&self, label: &str, value: &str) -> String {
        if self.use_color {
            let style = Style::new().bold().force_styling(true);
            format!("{}: {}", style.apply_to(label), value)
        } else {
            format!("{}: {}", label, value)
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(ColorWhen::default())
    }
}
