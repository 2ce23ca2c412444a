use std::collections::BTreeSet;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use logicsim::value::display_signal;
use logicsim::{
    Circuit, Decoder, ElementId, InputPin, Orientation, OutputPin, Placement, Signal, SimResult,
    Simulation, SimulationConfig,
};

/// Drive a decoder through every selector value and print its outputs.
#[derive(Debug, Parser)]
#[clap(name = "logicsim", version, about)]
struct Args {
    /// Decoder selector width in bits.
    #[clap(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=16))]
    width: u32,

    /// Dequeues allowed per drain.
    #[clap(long, default_value_t = 100_000)]
    max_steps: u64,

    /// Print the circuit as Verilog after the run.
    #[clap(long)]
    verilog: bool,

    /// Print the saved circuit as JSON after the run.
    #[clap(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> SimResult<()> {
    let mut circuit = Circuit::new();
    let sel = circuit.add(InputPin::new(Placement::at(0, 0), args.width)?)?;
    let dec = Decoder::create(&mut circuit, 60, 0, Orientation::Right, args.width)?;
    circuit.wire(sel, 0, dec, 0)?;

    // Watch the first and last lines.
    let lines = circuit.outputs(dec)?.len();
    let first = circuit.add(OutputPin::new(Placement::at(120, 0), 1)?)?;
    let last = circuit.add(OutputPin::new(Placement::at(120, 40), 1)?)?;
    circuit.wire(dec, Decoder::output_port(0), first, 0)?;
    circuit.wire(dec, Decoder::output_port(lines - 1), last, 0)?;

    let mut sim = Simulation::with_config(SimulationConfig::strict(args.max_steps));
    sim.settle(&mut circuit)?;

    println!("Decoder, {} bit selector, {} lines", args.width, lines);
    // Wide selectors are sampled rather than enumerated.
    let selectors: BTreeSet<usize> = (0..lines.min(16)).chain([lines - 1]).collect();
    for k in selectors {
        let report = sim.set_input(&mut circuit, sel, Some(k as u32))?;
        println!(
            "  sel={:<4} {}  steps={} first={} last={}",
            k,
            render(&circuit.output_values(dec)?),
            report.steps,
            line_value(&circuit, first)?,
            line_value(&circuit, last)?,
        );
    }

    let report = sim.set_input(&mut circuit, sel, None)?;
    println!(
        "  sel=x    {}  steps={}",
        render(&circuit.output_values(dec)?),
        report.steps
    );
    println!("  state hash {:016x}", circuit.state_hash());

    if args.verilog {
        println!();
        print!("{}", circuit.export_verilog("top"));
    }
    if args.json {
        println!();
        print_json(&circuit)?;
    }
    Ok(())
}

#[cfg(feature = "serialize")]
fn print_json(circuit: &Circuit) -> SimResult<()> {
    println!("{}", circuit.to_json()?);
    Ok(())
}

#[cfg(not(feature = "serialize"))]
fn print_json(_circuit: &Circuit) -> SimResult<()> {
    eprintln!("--json needs the `serialize` feature");
    Ok(())
}

/// Output lines, line 0 first. Long vectors are elided.
fn render(values: &[Signal]) -> String {
    let s: String = values
        .iter()
        .take(32)
        .map(|v| display_signal(*v))
        .collect();
    if values.len() > 32 {
        format!("{}...", s)
    } else {
        s
    }
}

fn line_value(circuit: &Circuit, pin: ElementId) -> SimResult<String> {
    let node = circuit.port(pin, 0)?;
    Ok(display_signal(circuit.value(node)?))
}
