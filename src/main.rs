//! Republic Progression - command line entry point
//!
//! Runs single engine operations against the progression config and the
//! spirit/class catalogs, printing the result as JSON.

use clap::{Parser, Subcommand, ValueEnum};
use republic_progression::classes::{can_unlock, ClassRegistry, MinionLoadout};
use republic_progression::core::error::{ProgressionError, Result};
use republic_progression::core::types::{MinionId, Rank, SpiritId};
use republic_progression::core::EngineConfig;
use republic_progression::progression::XpSource;
use republic_progression::score::{parse_parameter_size, MinionScore, ScoreInputs};
use republic_progression::spirits::{score_synergy, SpiritRegistry};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Progression and composition engine for AI Republic minions
#[derive(Parser, Debug)]
#[command(name = "republic-progression")]
#[command(about = "Compute minion XP, levels, ranks, synergies and class unlocks")]
struct Args {
    /// Progression config (curve, ladder, unlocks, policies). Built-in
    /// tables are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding spirits.toml and classes.toml
    #[arg(long, default_value = "data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a processed-item count through the XP curve
    Curve { quantity: i64 },

    /// Training XP for a completed job
    Training {
        items: i64,
        /// Quality score, 0-100
        quality: f64,
        /// Validation score, 0-100
        validation: f64,
    },

    /// Usage XP for one accounting period
    Usage {
        events: i64,
        /// Success rate, 0-1
        success_rate: f64,
    },

    /// Level, rank and distance to the next level for a total XP
    Level { total_xp: i64 },

    /// Compare two XP totals
    Transition { old_xp: i64, new_xp: i64 },

    /// Award XP, applying any rank-up bonus
    Award {
        old_total: i64,
        delta: i64,
        #[arg(long, value_enum, default_value_t = SourceArg::Training)]
        source: SourceArg,
    },

    /// Score a set of spirits
    Synergy {
        #[arg(required = true)]
        spirits: Vec<String>,
    },

    /// List classes, optionally filtered
    Classes {
        #[arg(long)]
        category: Option<String>,
        /// Only classes unlockable at this rank (name or ordinal)
        #[arg(long, requires = "level")]
        rank: Option<Rank>,
        #[arg(long, requires = "rank")]
        level: Option<u32>,
        /// Recommend classes for these interests instead
        #[arg(long, num_args = 1..)]
        interests: Vec<String>,
    },

    /// Check whether a class can be unlocked
    Unlock {
        class: String,
        rank: Rank,
        level: u32,
    },

    /// Assign a class to a fresh minion that already holds some spirits
    Assign {
        class: String,
        #[arg(long = "spirit")]
        spirits: Vec<String>,
    },

    /// Score a minion from its XP and model specs
    Score {
        total_xp: i64,
        /// Parameter size, e.g. 7B
        #[arg(long, default_value = "0B")]
        params: String,
        #[arg(long, default_value_t = 0)]
        context: u64,
        #[arg(long, default_value_t = 0)]
        capabilities: u32,
        #[arg(long, default_value = "")]
        architecture: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    Training,
    Usage,
}

impl From<SourceArg> for XpSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Training => XpSource::Training,
            SourceArg::Usage => XpSource::Usage,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_spirits(data: &Path) -> Result<SpiritRegistry> {
    SpiritRegistry::load(&data.join("spirits.toml"))
}

fn load_catalogs(data: &Path) -> Result<(SpiritRegistry, ClassRegistry)> {
    let spirits = load_spirits(data)?;
    let classes = ClassRegistry::load(&data.join("classes.toml"), &spirits)?;
    Ok((spirits, classes))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "republic_progression=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match args.command {
        Command::Curve { quantity } => {
            let xp = config.curve.resolve(quantity)?;
            print_json(&json!({ "quantity": quantity, "xp": xp }))
        }
        Command::Training {
            items,
            quality,
            validation,
        } => print_json(&config.training_breakdown(items, quality, validation)?),
        Command::Usage {
            events,
            success_rate,
        } => {
            let xp = config.usage_xp(events, success_rate)?;
            print_json(&json!({ "events": events, "success_rate": success_rate, "xp": xp }))
        }
        Command::Level { total_xp } => {
            let info = config.level_info(total_xp)?;
            let next = config.ladder.xp_to_next_level(total_xp)?;
            let title = &config.rank_definition(info.rank).title;
            print_json(&json!({
                "total_xp": total_xp,
                "level": info.level,
                "rank": info.rank,
                "rank_ordinal": info.rank.ordinal(),
                "title": title,
                "rank_level": info.rank_level,
                "uncapped": config.ladder.is_top(info.rank),
                "next_level": next,
                "unlocked": config.unlocked_skillsets(info.rank),
            }))
        }
        Command::Transition { old_xp, new_xp } => {
            print_json(&config.check_transition(old_xp, new_xp)?)
        }
        Command::Award {
            old_total,
            delta,
            source,
        } => print_json(&config.award_xp(old_total, delta, source.into())?),
        Command::Synergy { spirits } => {
            let registry = load_spirits(&args.data)?;
            let ids = spirits
                .iter()
                .map(|s| match registry.get(s) {
                    Some(spirit) => Ok(spirit.id.clone()),
                    None => Err(ProgressionError::SpiritNotFound(s.clone())),
                })
                .collect::<Result<Vec<SpiritId>>>()?;
            print_json(&score_synergy(&ids, &registry))
        }
        Command::Classes {
            category,
            rank,
            level,
            interests,
        } => {
            let (_, classes) = load_catalogs(&args.data)?;
            let mut found = if interests.is_empty() {
                classes.all()
            } else {
                classes.recommend(interests.as_slice())
            };
            if let Some(category) = &category {
                found.retain(|c| &c.category == category);
            }
            if let (Some(rank), Some(level)) = (rank, level) {
                found.retain(|c| can_unlock(c, rank, level).is_granted());
            }
            print_json(&found)
        }
        Command::Unlock { class, rank, level } => {
            let (_, classes) = load_catalogs(&args.data)?;
            let class = classes.require(&class)?;
            let check = can_unlock(class, rank, level);
            print_json(&json!({
                "class": class.name,
                "allowed": check.is_granted(),
                "reason": check.reason(),
                "check": check,
            }))
        }
        Command::Assign { class, spirits } => {
            let (registry, classes) = load_catalogs(&args.data)?;
            let class = classes.require(&class)?;

            let mut loadout = MinionLoadout::new(MinionId::new());
            for spirit in &spirits {
                if !registry.contains(spirit) {
                    return Err(ProgressionError::SpiritNotFound(spirit.clone()));
                }
                loadout.grant_spirit(SpiritId::from(spirit.as_str()));
            }

            match loadout.assign_class(class, &registry) {
                Ok(assignment) => {
                    let actual = loadout.net_performance(&registry);
                    print_json(&json!({
                        "assignment": assignment,
                        "loadout": loadout,
                        "actual": actual,
                    }))
                }
                Err(e) => print_json(&json!({ "assigned": false, "reason": e.to_string() })),
            }
        }
        Command::Score {
            total_xp,
            params,
            context,
            capabilities,
            architecture,
        } => {
            let parameters_billions = parse_parameter_size(&params).ok_or_else(|| {
                ProgressionError::InvalidInput(format!("unrecognized parameter size '{}'", params))
            })?;
            let inputs = ScoreInputs {
                total_xp,
                parameters_billions,
                context_length: context,
                capability_count: capabilities,
                architecture,
            };
            print_json(&MinionScore::compute(&config, &inputs)?)
        }
    }
}
