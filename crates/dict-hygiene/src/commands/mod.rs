//! Command implementations.

use anyhow::bail;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use dict_hygiene_core::scan::ScanProgress;
use dict_hygiene_core::{AnalyzerKind, Category, Config, DictionaryStore, FilterSet, LanguageCode};

pub mod backups;
pub mod delete;
pub mod info;
pub mod save;
pub mod scan;
pub mod search;
#[cfg(feature = "mcp")]
pub mod serve;

/// Language selection shared by dictionary commands.
#[derive(Args, Debug, Default, Clone)]
pub struct LangArgs {
    /// Dictionary language (defaults to `default_language` from config)
    #[arg(short, long)]
    pub lang: Option<String>,
}

impl LangArgs {
    /// Validate the requested (or configured default) language.
    pub fn resolve(&self, store: &DictionaryStore, config: &Config) -> anyhow::Result<LanguageCode> {
        let code = self.lang.as_deref().unwrap_or(&config.default_language);
        Ok(store.language(code)?)
    }
}

/// Category filters shared by `scan` and `delete`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Categories to switch off (comma-separated); all others stay on
    #[arg(long, value_delimiter = ',', value_enum)]
    pub hide: Vec<Category>,
}

impl FilterArgs {
    /// Filter set for `kind` with the hidden categories removed.
    ///
    /// Naming a category the analyzer does not report is an error.
    pub fn filters_for(&self, kind: AnalyzerKind) -> anyhow::Result<FilterSet> {
        build_filters(kind, &self.hide)
    }
}

/// Default filters for `kind` minus `hide`.
pub fn build_filters(kind: AnalyzerKind, hide: &[Category]) -> anyhow::Result<FilterSet> {
    let mut filters = kind.default_filters();
    for &category in hide {
        if !kind.categories().contains(&category) {
            let valid: Vec<&str> = kind.categories().iter().map(|c| c.as_str()).collect();
            bail!(
                "category '{category}' does not apply to the {kind} analyzer (valid: {})",
                valid.join(", ")
            );
        }
        filters.disable(category);
    }
    Ok(filters)
}

/// Terminal progress bar fed by scan progress updates.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Visible bar labelled `message`, or a hidden one when `visible` is false.
    pub fn new(visible: bool, message: &str) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(0);
            if let Ok(style) =
                ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            {
                bar.set_style(style.progress_chars("=> "));
            }
            bar.set_message(message.to_string());
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ScanProgress for BarProgress {
    fn on_progress(&mut self, scanned: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(scanned as u64);
    }
}
