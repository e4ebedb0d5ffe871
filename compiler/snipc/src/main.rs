//! Snip CLI
//!
//! Evaluates one snippet from the command line.

use snipc::commands::{eval_snippet, parse_options, print_unit};

fn main() {
    snipc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "eval" | "unit" => {
            let options = match parse_options(&args[2..]) {
                Ok(options) => options,
                Err(err) => {
                    eprintln!("error: {err}");
                    eprintln!("Usage: snip {command} <snippet> [options]");
                    eprintln!("Run `snip help` for the list of options.");
                    std::process::exit(1);
                }
            };
            let code = if command == "eval" {
                eval_snippet(&options)
            } else {
                print_unit(&options)
            };
            std::process::exit(code);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("Snip {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Snip snippet evaluator");
    println!();
    println!("Usage: snip <command> <snippet> [options]");
    println!();
    println!("Commands:");
    println!("  eval <snippet>       Compile the snippet and print its result");
    println!("  unit <snippet>       Print the unit generated for the snippet");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  -r, --result <type>        Result type (default: Object)");
    println!("  -p, --param <n:type=v>     Add a parameter and its argument");
    println!("  -c, --const <n:type=v>     Add a constant");
    println!("  -e, --expr                 Treat the snippet as an expression");
    println!("  --prefix <name>            Prefix of generated unit names");
    println!("  --log-units                Log generated units (needs SNIP_LOG)");
    println!("  --detailed                 Show source excerpts for compile errors");
    println!();
    println!("Environment:");
    println!("  SNIP_LOG=<filter>          Enable logging, e.g. SNIP_LOG=snipc=debug");
    println!();
    println!("Examples:");
    println!("  snip eval -e 'a + b' -p a:int=1 -p b:int=2 -r int");
    println!("  snip eval 'return a.substring(b);' -p 'a:String=Hello World' -p b:int=6");
    println!("  snip eval -e 'a.equals(x)' -p a:String=Hello -c 'x:String=Hello World'");
    println!("  snip unit -e 'a * 2' -p a:long=21 -r long");
}
