use chrono::Local;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::env;
use std::fs;
use std::process;

use syndrome_code::code::matrix::to_rows;
use syndrome_code::logging;
use syndrome_code::types::BuildMetrics;
use syndrome_code::{
    CodecConfig, CodecError, CodecSession, CodeParameters, CosetLeader, Result, SessionOptions, Symbol,
    TransmissionReport,
};

/// Message length used when `--bits` is not given.
const DEFAULT_MESSAGE_LENGTH: usize = 32;

fn main() {
    let args: Vec<String> = env::args().collect();

    let command = args.get(1).map(String::as_str).unwrap_or("cli");
    let options = if args.len() > 2 { &args[2..] } else { &[][..] };

    let outcome = match command {
        "cli" => run_single_test(options),
        "table" => print_table(options),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other if other.starts_with("--") => run_single_test(&args[1..]),
        other => {
            println!("Unknown command: {}", other);
            print_help();
            process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn program_name() -> String {
    env::args().next().unwrap_or_else(|| String::from("syndrome_code"))
}

fn print_help() {
    println!("Usage: {} [COMMAND] [OPTIONS]", program_name());
    println!("Commands:");
    println!("  cli                  Encode, transmit and decode a message (default)");
    println!("  table                Print G, H and the coset leader table");
    println!("  help                 Print this help message");
    println!();
    println!("Options:");
    println!("  --n=N               Codeword length (default: 7)");
    println!("  --k=K               Message length (default: 4)");
    println!("  --q=Q               Channel alphabet size (default: 2)");
    println!("  --pe=P              Symbol error probability (default: 0.0001)");
    println!("  --seed=S            Seed for the generator matrix and the channel");
    println!("  --strategy=NAME     Table construction: weighted, exhaustive or parallel");
    println!("  --decoder=NAME      Decoder: table or greedy");
    println!("  --bits=B1,B2,...    Comma-separated message symbols (default: random)");
    println!("  --config=FILE       Read defaults from a JSON file; flags win over it");
    println!("  --json              Print the result as JSON");
    println!("  --verbose           Echo detailed progress to stderr");
    println!();
    println!("Example:");
    println!("  {} cli --n=15 --k=11 --pe=0.01 --seed=7 --bits=1,0,1,1,0,0,1", program_name());
}

struct CliArgs {
    config: CodecConfig,
    config_file: Option<String>,
    bits: Option<Vec<Symbol>>,
    json: bool,
    verbose: bool,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| CodecError::Config(format!("invalid value '{}' for --{}", value, flag)))
}

/// Parse command line arguments
fn parse_cli_args(args: &[String]) -> Result<CliArgs> {
    let mut config = CodecConfig::default();
    let mut config_file = None;
    let mut bits = None;
    let mut json = false;
    let mut verbose = false;

    for arg in args {
        if let Some(value) = arg.strip_prefix("--n=") {
            config.n = Some(parse_value("n", value)?);
        } else if let Some(value) = arg.strip_prefix("--k=") {
            config.k = Some(parse_value("k", value)?);
        } else if let Some(value) = arg.strip_prefix("--q=") {
            config.q = Some(parse_value("q", value)?);
        } else if let Some(value) = arg.strip_prefix("--pe=") {
            config.pe = Some(parse_value("pe", value)?);
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            config.seed = Some(parse_value("seed", value)?);
        } else if let Some(value) = arg.strip_prefix("--strategy=") {
            config.strategy = Some(value.parse()?);
        } else if let Some(value) = arg.strip_prefix("--decoder=") {
            config.decoder = Some(value.parse()?);
        } else if let Some(value) = arg.strip_prefix("--bits=") {
            let symbols = value
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| parse_value("bits", s))
                .collect::<Result<Vec<Symbol>>>()?;
            bits = Some(symbols);
        } else if let Some(value) = arg.strip_prefix("--config=") {
            config_file = Some(value.to_string());
        } else if arg == "--json" {
            json = true;
        } else if arg == "--verbose" {
            verbose = true;
        } else {
            return Err(CodecError::Config(format!("unknown option '{}'", arg)));
        }
    }

    Ok(CliArgs { config, config_file, bits, json, verbose })
}

/// Flags over file over defaults.
fn load_config(cli: &CliArgs) -> Result<CodecConfig> {
    let base = match &cli.config_file {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .map_err(|e| CodecError::Config(format!("cannot read {}: {}", path, e)))?;
            CodecConfig::from_json_str(&contents)?
        }
        None => CodecConfig::default(),
    };
    Ok(base.overridden_by(cli.config.clone()))
}

fn prepare(options: &[String]) -> Result<(CliArgs, CodecConfig, u64)> {
    let cli = parse_cli_args(options)?;
    logging::set_verbose(cli.verbose);
    logging::set_echo(cli.verbose);

    let config = load_config(&cli)?;
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    Ok((cli, config, seed))
}

fn run_single_test(options: &[String]) -> Result<()> {
    let (cli, config, seed) = prepare(options)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    if !cli.json {
        println!("Starting syndrome codec at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!("Seed: {}", seed);
    }

    let session = CodecSession::from_config(&config, &mut rng)?;
    let bits = match cli.bits {
        Some(bits) => bits,
        None => (0..DEFAULT_MESSAGE_LENGTH).map(|_| rng.gen_range(0..2)).collect(),
    };
    let report = session.transmit(&bits, &mut rng)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| CodecError::Config(e.to_string()))?;
        println!("{}", json);
    } else {
        print_report(&session, &bits, &report);
    }
    Ok(())
}

fn format_word(word: &[Symbol]) -> String {
    word.iter().map(|s| s.to_string()).collect::<Vec<_>>().join("")
}

fn print_report(session: &CodecSession, bits: &[Symbol], report: &TransmissionReport) {
    let params = session.params();
    println!(
        "Code: [{}, {}] q={} pe={} rate={:.3} ({} table, {} decoder)",
        params.n(), params.k(), params.q(), params.pe(), params.rate(),
        report.options.strategy, report.options.decoder
    );
    println!("Input:    {}", format_word(bits));
    println!("Decoded:  {}", format_word(&report.decoded));
    println!("Uncoded:  {}", format_word(&report.uncoded));

    if report.message_bit_errors == 0 {
        println!("✅ Message recovered successfully!");
    } else {
        println!("❌ {} message symbols wrong after decoding", report.message_bit_errors);
    }

    println!("\n--- Channel Summary ---");
    println!("Blocks: {}", report.blocks);
    println!("Channel errors (coded): {}", report.channel_errors);
    println!("Fixed by decoding: {}", report.fixed_errors);
    println!("Channel errors (uncoded): {}", report.uncoded_errors);
    println!(
        "Residual error rate: {:.4} (uncoded: {:.4})",
        report.residual_error_rate(), report.uncoded_error_rate()
    );

    let metrics = &report.metrics;
    println!("\n--- Performance Summary ---");
    println!("Table build: {:.2?} ({} patterns examined)",
             session.table().metrics().duration, session.table().metrics().patterns_examined);
    for phase in [&metrics.encoding, &metrics.channel, &metrics.decoding] {
        println!("{}: {:.2?} ({:.2}%)", phase.name, phase.duration, phase.percentage);
    }
    println!("Total execution time: {:.2?}", metrics.total_time);
}

#[derive(Serialize)]
struct TableSummary<'a> {
    params: &'a CodeParameters,
    options: SessionOptions,
    generator: Vec<Vec<u8>>,
    parity_check: Vec<Vec<u8>>,
    weight_distribution: Vec<usize>,
    metrics: &'a BuildMetrics,
    leaders: Vec<CosetLeader>,
}

fn print_table(options: &[String]) -> Result<()> {
    let (cli, config, seed) = prepare(options)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let session = CodecSession::from_config(&config, &mut rng)?;
    let table = session.table();

    if cli.json {
        let summary = TableSummary {
            params: session.params(),
            options: session.options(),
            generator: to_rows(session.generator().as_array()),
            parity_check: to_rows(session.parity_check().as_array()),
            weight_distribution: table.weight_distribution(),
            metrics: table.metrics(),
            leaders: table.iter().collect(),
        };
        let json = serde_json::to_string_pretty(&summary).map_err(|e| CodecError::Config(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    println!("Seed: {}", seed);
    println!("G =");
    for row in session.generator().to_rows() {
        println!("  {}", row.iter().map(|b| b.to_string()).collect::<String>());
    }
    println!("H =");
    for row in session.parity_check().to_rows() {
        println!("  {}", row.iter().map(|b| b.to_string()).collect::<String>());
    }

    println!("\n{:<w$}  {:<n$}  weight", "syndrome", "leader", w = table.redundancy().max(8), n = table.n());
    for leader in table.iter() {
        println!(
            "{:<w$}  {:<n$}  {}",
            leader.syndrome.to_string(), format_word(&leader.pattern), leader.weight,
            w = table.redundancy().max(8), n = table.n()
        );
    }

    println!("\nWeight distribution: {:?}", table.weight_distribution());
    let metrics = table.metrics();
    println!("Built in {:.2?} using {} ({} patterns examined, {} progress steps, {} bytes)",
             metrics.duration, metrics.strategy, metrics.patterns_examined, metrics.steps_completed, metrics.storage_bytes);
    Ok(())
}
