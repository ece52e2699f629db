use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding config.yaml and the data files
    /// (defaults to $YATRA_BASE_PATH or the current directory)
    #[clap(long, global = true)]
    pub base_path: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the itinerary HTTP server.
    Serve {},

    /// Embed the monument catalog and write the vector index and labels.
    BuildIndex {
        /// Don't draw a progress bar
        #[clap(long, default_value = "false")]
        no_progress: bool,
    },

    /// Ask a free-form travel question (reads stdin when no text is given).
    Query {
        #[clap(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Generate one itinerary and print it.
    Plan {
        #[clap(short, long)]
        city: String,

        /// Trip duration, e.g. "2-day"
        #[clap(short, long, default_value = "1-day")]
        duration: String,

        /// "Budget Friendly", "Moderate" or "Luxury Experience"
        #[clap(short, long, default_value = "Moderate")]
        budget: String,

        /// Interest tag, may be repeated (e.g. "Forts & Palaces")
        #[clap(short, long = "interest")]
        interests: Vec<String>,

        /// Current "lat,lon"
        #[clap(short, long, allow_hyphen_values = true)]
        location: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_args() {
        let args = Args::parse_from([
            "yatra",
            "plan",
            "--city",
            "Jaipur",
            "-d",
            "2-day",
            "-i",
            "Forts & Palaces",
            "-i",
            "Traditional Food",
            "--location",
            "-26.9,75.8",
        ]);

        match args.command {
            Command::Plan {
                city,
                duration,
                budget,
                interests,
                location,
            } => {
                assert_eq!(city, "Jaipur");
                assert_eq!(duration, "2-day");
                assert_eq!(budget, "Moderate");
                assert_eq!(interests, vec!["Forts & Palaces", "Traditional Food"]);
                assert_eq!(location.as_deref(), Some("-26.9,75.8"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_query_collects_words() {
        let args = Args::parse_from(["yatra", "--base-path", "/srv/yatra", "query", "forts", "in", "Agra"]);
        assert_eq!(args.base_path.as_deref(), Some("/srv/yatra"));
        match args.command {
            Command::Query { text } => assert_eq!(text.join(" "), "forts in Agra"),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
