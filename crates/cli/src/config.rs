//! # Harvest Configuration
//!
//! Every setting has a built-in default, so the binary harvests the GLOS
//! catalogue when run without arguments. Flags and environment variables
//! (also read from a `.env` file) override the defaults.

use clap::Parser;
use glos_harvest::constants::{DEFAULT_ANYTEXT_PATTERN, DEFAULT_CSW_ENDPOINT, DEFAULT_WAF_DIR};
use glos_harvest::Filter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Harvest GLOS ISO metadata records from a CSW catalogue", long_about = None)]
pub struct HarvestArgs {
    /// The CSW endpoint to query
    #[arg(long, env = "GLOS_CSW_ENDPOINT", default_value = DEFAULT_CSW_ENDPOINT)]
    pub endpoint: String,

    /// Free-text pattern matched against csw:AnyText (`%` is the wildcard)
    #[arg(long, env = "GLOS_CSW_PATTERN", default_value = DEFAULT_ANYTEXT_PATTERN)]
    pub pattern: String,

    /// Directory every retrieved record is written to
    #[arg(long, env = "GLOS_WAF_DIR", default_value = DEFAULT_WAF_DIR)]
    pub output_dir: PathBuf,

    /// Skip writing records to disk
    #[arg(long)]
    pub no_write: bool,

    /// Write summaries of the GLOS records found to this JSON file
    #[arg(long)]
    pub matches_json: Option<PathBuf>,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, env = "GLOS_CSW_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl HarvestArgs {
    /// The filter sent with the search; an empty pattern means no filter.
    pub fn filter(&self) -> Option<Filter> {
        (!self.pattern.is_empty()).then(|| Filter::any_text_like(self.pattern.as_str()))
    }

    pub fn write_dir(&self) -> Option<&PathBuf> {
        (!self.no_write).then_some(&self.output_dir)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_glos_harvest() {
        let args = HarvestArgs::parse_from(["glos-harvest"]);
        assert_eq!(args.endpoint, "http://data.glos.us/metadata/srv/eng/csw");
        assert_eq!(args.filter(), Some(Filter::any_text_like("%tds.glos.us%")));
        assert_eq!(args.write_dir(), Some(&PathBuf::from("/tmp/glos_waf")));
        assert!(args.timeout().is_none());
    }

    #[test]
    fn test_overrides() {
        let args = HarvestArgs::parse_from([
            "glos-harvest",
            "--endpoint",
            "http://localhost:8080/csw",
            "--pattern",
            "",
            "--no-write",
            "--timeout-secs",
            "30",
        ]);
        assert_eq!(args.endpoint, "http://localhost:8080/csw");
        assert_eq!(args.filter(), None);
        assert_eq!(args.write_dir(), None);
        assert_eq!(args.timeout(), Some(Duration::from_secs(30)));
    }
}
