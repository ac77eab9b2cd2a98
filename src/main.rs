use clap::Parser;
use itertools::Itertools;

use feature_flag_evaluation::{registry_from_store, AttrValue, Context, JsonFileStore};

/// One-shot flag evaluation: load flags from a JSON file, evaluate one
/// against a context assembled from the options below.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file holding the flag definitions (object keyed by flag name)
    flags_file: String,
    /// Name of the flag to evaluate; omit to list all flags
    flag: Option<String>,
    /// User id for percentage rollouts (optional)
    #[arg(long)]
    user: Option<String>,
    /// User role (optional)
    #[arg(long)]
    role: Option<String>,
    /// Environment, e.g. development/staging/production (optional)
    #[arg(long)]
    env: Option<String>,
    /// Region (optional)
    #[arg(long)]
    region: Option<String>,
    /// Extra context attributes as key=value (repeatable)
    #[arg(long = "ctx", value_name = "KEY=VALUE")]
    ctx: Vec<String>,
    /// Print the user's rollout bucket instead of evaluating
    #[arg(long)]
    bucket: bool,
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();

    // Load the flag definitions.
    let store = JsonFileStore::new(&args.flags_file);
    let registry = match registry_from_store(&store) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // No flag name: list what the file defines, sorted.
    let Some(flag) = args.flag.as_deref() else {
        for (name, record) in registry.list().into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
            println!("{name}: {record:?}");
        }
        return;
    };

    // Diagnostics mode: show the deterministic bucket for user+flag.
    if args.bucket {
        let Some(user) = args.user.as_deref() else {
            eprintln!("--bucket requires --user");
            std::process::exit(1);
        };
        println!("{}", registry.assign_user_to_bucket(user, flag));
        return;
    }

    // Assemble the local context.
    let mut ctx = Context::new();
    ctx.user_id = args.user;
    ctx.user_role = args.role;
    ctx.environment = args.env;
    ctx.region = args.region;
    for pair in &args.ctx {
        let Some((key, value)) = pair.split_once('=') else {
            eprintln!("Invalid --ctx entry (expected key=value): {pair}");
            std::process::exit(1);
        };
        // Bare true/false and numbers compare as such; everything else is a string.
        let value = match serde_json::from_str::<serde_json::Value>(value) {
            Ok(serde_json::Value::Bool(b)) => AttrValue::Bool(b),
            Ok(serde_json::Value::Number(n)) if n.as_f64().is_some() => {
                AttrValue::Num(n.as_f64().unwrap())
            }
            _ => AttrValue::Str(value.to_string()),
        };
        ctx.set(key.to_string(), value);
    }

    // Evaluate and report.
    match registry.is_enabled(flag, Some(&ctx)) {
        Ok(enabled) => println!("{enabled}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
