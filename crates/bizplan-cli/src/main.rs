//! `bizplan` - print the views served by the planning data services as JSON

use anyhow::{Context, Result};
use bizplan_core::metrics::{self, ProjectFilter};
use bizplan_core::{Fixtures, ServiceConfig, Services};
use bizplan_model::{FrameworkId, ProjectId, TemplateCategory, TimeRange};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("bizplan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect business-plan projects, financials, templates and analytics")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with request policy and latency settings"),
        )
        .arg(
            Arg::new("fixtures")
                .long("fixtures")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory of fixture JSON files replacing the bundled data"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("dashboard").about("Headline project metrics"))
        .subcommand(
            Command::new("projects")
                .about("List, filter or show projects")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .help("Show a single project"),
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(String))
                        .help("draft, in-progress, completed or high-score (repeatable)"),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .default_value("")
                        .help("Case-insensitive match on name and description"),
                ),
        )
        .subcommand(
            Command::new("templates")
                .about("Browse the template gallery")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("tech, retail, service or manufacturing"),
                )
                .arg(
                    Arg::new("featured")
                        .long("featured")
                        .action(ArgAction::SetTrue)
                        .help("Only featured templates"),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Match on name, description or category"),
                )
                .arg(
                    Arg::new("counts")
                        .long("counts")
                        .action(ArgAction::SetTrue)
                        .help("Number of templates per category"),
                ),
        )
        .subcommand(
            Command::new("financials")
                .about("Financial model of a project, with totals and scenarios")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .help("Project id"),
                ),
        )
        .subcommand(
            Command::new("validation")
                .about("Validation scores of a project")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .help("Project id"),
                ),
        )
        .subcommand(
            Command::new("analytics")
                .about("Aggregate analytics")
                .arg(
                    Arg::new("range")
                        .long("range")
                        .default_value("30d")
                        .help("7d, 30d, 90d or 1y"),
                )
                .arg(
                    Arg::new("usage")
                        .long("usage")
                        .action(ArgAction::SetTrue)
                        .help("Usage counters instead of the snapshot"),
                )
                .arg(
                    Arg::new("project")
                        .long("project")
                        .help("Progress summary of one project"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_services(matches: &ArgMatches) -> Result<Services> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    let fixtures = match matches.get_one::<PathBuf>("fixtures") {
        Some(dir) => Fixtures::from_dir(dir)
            .with_context(|| format!("loading fixtures from {}", dir.display()))?,
        None => Fixtures::bundled().context("loading bundled fixtures")?,
    };
    Ok(Services::new(fixtures, &config))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn project_arg(args: &ArgMatches, name: &str) -> Result<ProjectId> {
    let raw = args
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default();
    Ok(bizplan_core::parse_id(raw)?)
}

async fn run(matches: ArgMatches) -> Result<()> {
    let services = load_services(&matches)?;

    match matches.subcommand() {
        Some(("dashboard", _)) => {
            let projects = services.projects.get_all().await?;
            print_json(&metrics::dashboard(&projects))
        }
        Some(("projects", args)) => {
            if args.contains_id("id") {
                let id = project_arg(args, "id")?;
                return print_json(&services.projects.get_by_id(id).await?);
            }
            let filters = args
                .get_many::<String>("filter")
                .unwrap_or_default()
                .map(|f| f.parse::<ProjectFilter>())
                .collect::<Result<Vec<_>, _>>()?;
            let term = args.get_one::<String>("search").cloned().unwrap_or_default();
            print_json(&services.projects.find(filters, &term).await?)
        }
        Some(("templates", args)) => {
            if args.get_flag("counts") {
                let templates = services.templates.get_all().await?;
                return print_json(&metrics::category_counts(&templates));
            }
            let templates = if let Some(category) = args.get_one::<String>("category") {
                let category: TemplateCategory = category.parse()?;
                services.templates.get_by_category(category).await?
            } else if args.get_flag("featured") {
                services.templates.get_featured().await?
            } else if let Some(term) = args.get_one::<String>("search") {
                services.templates.search(term).await?
            } else {
                services.templates.get_all().await?
            };
            print_json(&templates)
        }
        Some(("financials", args)) => {
            let project_id = project_arg(args, "project")?;
            let model = services.financials.get_or_create_by_project_id(project_id).await?;
            let totals = metrics::financial_totals(&model);
            print_json(&json!({
                "model": model,
                "totals": totals,
                "margin": totals.margin(),
                "scenarios": metrics::scenario_outcomes(&model),
                "monthly": metrics::monthly_breakdown(&model),
            }))
        }
        Some(("validation", args)) => {
            let project_id = project_arg(args, "project")?;
            let record = services.validation.get_or_create_by_project_id(project_id).await?;
            let frameworks: Vec<_> = FrameworkId::ALL
                .into_iter()
                .map(|f| {
                    json!({
                        "framework": f,
                        "name": f.framework().name,
                        "score": metrics::framework_score(&record, f),
                        "recommendations": record.recommendations_for(f).collect::<Vec<_>>(),
                    })
                })
                .collect();
            print_json(&json!({
                "record": record,
                "frameworks": frameworks,
                "overall": metrics::overall_score(&record),
            }))
        }
        Some(("analytics", args)) => {
            if args.get_flag("usage") {
                return print_json(&services.analytics.usage_stats().await?);
            }
            if args.contains_id("project") {
                let id = project_arg(args, "project")?;
                let project = services.projects.get_by_id(id).await?;
                return print_json(&services.analytics.project_analytics(&project).await?);
            }
            let range = args
                .get_one::<String>("range")
                .map_or(Ok(TimeRange::default()), |r| r.parse::<TimeRange>())?;
            print_json(&services.analytics.get_analytics(range).await?)
        }
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    if let Err(err) = run(matches).await {
        match err.downcast_ref::<bizplan_core::ServiceError>() {
            Some(service_err) => eprintln!("error: {}", service_err.user_message()),
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}
