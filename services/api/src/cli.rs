use crate::rank::{run_rank, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use opportunity_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Opportunity Match",
    about = "Rank students against opportunities and serve the application lifecycle API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank a CSV snapshot of opportunities for one student profile
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["opportunity-match-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_accepts_comma_separated_profile() {
        let cli = Cli::try_parse_from([
            "opportunity-match-api",
            "rank",
            "--student-skills",
            "Python,SQL",
            "--student-tags",
            "8,10",
            "--opportunities",
            "openings.csv",
            "--limit",
            "5",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.student_skills, vec!["Python", "SQL"]);
                assert_eq!(args.student_tags, vec![8, 10]);
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["opportunity-match-api", "serve", "--port", "8088"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8088)),
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
