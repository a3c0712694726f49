use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::figures::DonutHighlight;
use crate::palette::CategoryPalette;
use crate::render::DEFAULT_STYLESHEET;
use crate::server::ServerConfig;
use crate::snapshot::BuildOptions;

#[derive(Parser, Debug)]
#[command(name = "nexavision-briefing")]
#[command(about = "Serves the NexaVision datathon policy briefing dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the five viz_data_*.csv snippets
    #[arg(long, env = "BRIEFING_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Address to bind the web server to
    #[arg(long, env = "BRIEFING_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port for the web server
    #[arg(short, long, env = "BRIEFING_PORT", default_value_t = 8050)]
    pub port: u16,

    /// External stylesheet linked from the page
    #[arg(long, default_value = DEFAULT_STYLESHEET)]
    pub stylesheet: String,

    /// Failure type to pull out of the donut (defaults to the first row)
    #[arg(long)]
    pub donut_highlight: Option<String>,

    /// Write the composed page to this file and exit instead of serving
    #[arg(long)]
    pub render_only: Option<PathBuf>,
}

impl Cli {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            stylesheet: self.stylesheet.clone(),
            palette: CategoryPalette::drivers(),
            donut_highlight: self
                .donut_highlight
                .clone()
                .map(DonutHighlight::Category)
                .unwrap_or_default(),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hosted_briefing() {
        let cli = Cli::try_parse_from(["nexavision-briefing"]).unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("."));
        assert_eq!(cli.port, 8050);
        assert_eq!(cli.stylesheet, DEFAULT_STYLESHEET);
        assert_eq!(cli.build_options().donut_highlight, DonutHighlight::First);
        assert!(cli.render_only.is_none());
    }

    #[test]
    fn highlight_flag_selects_category() {
        let cli = Cli::try_parse_from([
            "nexavision-briefing",
            "--donut-highlight",
            "Chronic Failure",
            "--port",
            "9000",
        ])
        .unwrap();

        assert_eq!(
            cli.build_options().donut_highlight,
            DonutHighlight::Category("Chronic Failure".to_string())
        );
        assert_eq!(cli.server_config().port, 9000);
    }

    #[test]
    fn rejects_bad_host() {
        assert!(Cli::try_parse_from(["nexavision-briefing", "--host", "not-an-ip"]).is_err());
    }
}
