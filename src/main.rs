// Thin CLI over the report pipeline.
//
// Usage: ledger_report <local_csv> <fallback_csv> <output_dir>
//
// The binary only parses arguments, wires up logging, and prints the
// result; all processing lives in the library.
use ledger_report::output::preview_table_rows;
use ledger_report::pipeline::generate_report;
use ledger_report::util::format_int;
use std::env;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!(
            "Usage: {} <local_csv> <fallback_csv> <output_dir>",
            args.first().map_or("ledger_report", String::as_str)
        );
        return ExitCode::from(2);
    }

    let (summary, rows) = match generate_report(
        Path::new(&args[1]),
        Path::new(&args[2]),
        Path::new(&args[3]),
    ) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("report failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Monthly Sales Summary\n");
    preview_table_rows(&rows, 6);
    println!(
        "{} rows read, {} dropped (parse), {} filtered, {} duplicates removed, {} clean rows.",
        format_int(summary.rows_read as i64),
        format_int(summary.rows_dropped_parse as i64),
        format_int(summary.rows_dropped_filter as i64),
        format_int(summary.duplicates_removed as i64),
        format_int(summary.clean_rows as i64)
    );
    println!("Report saved to: {}\n", summary.output_file.display());

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("could not render run summary: {e}"),
    }

    ExitCode::SUCCESS
}
