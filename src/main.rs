//! Conv Viz CLI - Drive the convolution visualization from the terminal.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use conv_viz::{
    compute::{DisplaySink, Session, StepTrace},
    schema::{
        ActiveCells, CHANNELS, Channel, DisplayFrame, INPUT_SIZE, KernelPosition, OUTPUT_SIZE,
        VisualizationConfig,
    },
};

/// Text renderer holding its own copy of every cube label.
struct TerminalSink {
    input_labels: Vec<Vec<String>>,
    output_labels: Vec<String>,
    active: Option<ActiveCells>,
}

impl TerminalSink {
    fn new(frame: &DisplayFrame) -> Self {
        Self {
            input_labels: frame.input_labels.clone(),
            output_labels: frame.output_labels.clone(),
            active: None,
        }
    }

    fn cell(label: &str, highlighted: bool) -> String {
        if highlighted {
            format!("[{label:>4}]")
        } else {
            format!(" {label:>4} ")
        }
    }

    fn print_grids(&self) {
        let header: Vec<String> = Channel::ALL
            .iter()
            .map(|c| format!("{:<width$}", c.label(), width = INPUT_SIZE * 6))
            .collect();
        println!("{}  Output", header.join("  "));

        for y in 0..INPUT_SIZE {
            let mut row = String::new();
            for c in 0..CHANNELS {
                for x in 0..INPUT_SIZE {
                    let highlighted = self
                        .active
                        .as_ref()
                        .is_some_and(|a| a.contains_input(c, x, y));
                    let label = &self.input_labels[c][y * INPUT_SIZE + x];
                    row.push_str(&Self::cell(label, highlighted));
                }
                row.push_str("  ");
            }
            if y < OUTPUT_SIZE {
                for x in 0..OUTPUT_SIZE {
                    let highlighted = self
                        .active
                        .as_ref()
                        .is_some_and(|a| a.output == KernelPosition::new(x, y));
                    let label = &self.output_labels[y * OUTPUT_SIZE + x];
                    row.push_str(&Self::cell(label, highlighted));
                }
            }
            println!("{}", row.trim_end());
        }
    }
}

impl DisplaySink for TerminalSink {
    fn apply_highlight(&mut self, active: Option<&ActiveCells>) {
        self.active = active.cloned();
    }

    fn set_output_label(&mut self, position: KernelPosition, label: &str) {
        if let Some(slot) = self
            .output_labels
            .get_mut(position.y * OUTPUT_SIZE + position.x)
        {
            *slot = label.to_string();
        }
    }

    fn show_calculation(&mut self, trace: &StepTrace, summary: &str) {
        self.print_grids();
        println!();
        println!("{summary}");
        for line in trace.lines() {
            println!("{line}");
        }
        println!("{}", trace.result_line());
    }

    fn sync_sliders(&mut self, position: KernelPosition) {
        println!("Kernel X: {}  Kernel Y: {}", position.x, position.y);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  x <0-5>          Set kernel X");
    println!("  y <0-5>          Set kernel Y");
    println!("  pos <x> <y>      Set kernel position");
    println!("  reset            Move kernel back to (2,2)");
    println!("  auto [on|off]    Toggle or set the automatic sweep");
    println!("  frames <n>       Run n animation frames (default: 50)");
    println!("  highlight        Toggle kernel area highlight");
    println!("  show             Redraw the current state");
    println!("  json             Print the current display frame as JSON");
    println!("  help             Show this message");
    println!("  quit             Exit");
}

fn parse_coord(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|s| s.parse().ok())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_config();
        return;
    }

    let config: VisualizationConfig = match args.get(1) {
        Some(path) => {
            let config_path = PathBuf::from(path);
            let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => VisualizationConfig::default(),
    };

    let mut session = Session::new(&config).unwrap_or_else(|e| {
        eprintln!("Error starting session: {}", e);
        std::process::exit(1);
    });

    println!("Conv Viz");
    println!("========");
    println!(
        "Input: {}x{}x{}  Kernel: 3x3x{}  Output: {}x{}",
        INPUT_SIZE, INPUT_SIZE, CHANNELS, CHANNELS, OUTPUT_SIZE, OUTPUT_SIZE
    );
    println!("Type 'help' for commands.");
    println!();

    let mut sink = TerminalSink::new(&session.display_frame());
    session.notify(&mut sink);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }

        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };

        let result = match command {
            "x" => match parse_coord(parts.next()) {
                Some(x) => session.set_kernel_x(x).map(|_| true),
                None => {
                    eprintln!("Usage: x <0-5>");
                    Ok(false)
                }
            },
            "y" => match parse_coord(parts.next()) {
                Some(y) => session.set_kernel_y(y).map(|_| true),
                None => {
                    eprintln!("Usage: y <0-5>");
                    Ok(false)
                }
            },
            "pos" => match (parse_coord(parts.next()), parse_coord(parts.next())) {
                (Some(x), Some(y)) => session.set_position(x, y).map(|_| true),
                _ => {
                    eprintln!("Usage: pos <x> <y>");
                    Ok(false)
                }
            },
            "reset" => session.reset_position().map(|_| true),
            "auto" => {
                match parts.next() {
                    Some("on") => session.set_auto_sweep(true),
                    Some("off") => session.set_auto_sweep(false),
                    _ => {
                        session.toggle_auto_sweep();
                    }
                }
                println!(
                    "Auto sweep {}",
                    if session.is_sweeping() { "on" } else { "off" }
                );
                Ok(false)
            }
            "frames" => {
                let count: u64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(50);
                let mut moved = Ok(false);
                for _ in 0..count {
                    match session.frame() {
                        Ok(Some(_)) => moved = Ok(true),
                        Ok(None) => {}
                        Err(e) => {
                            moved = Err(e);
                            break;
                        }
                    }
                }
                if matches!(moved, Ok(false)) {
                    println!("Auto sweep is off; kernel did not move");
                }
                moved
            }
            "highlight" => session.toggle_highlight().map(|visible| {
                println!("Kernel area {}", if visible { "shown" } else { "hidden" });
                true
            }),
            "show" => Ok(true),
            "json" => {
                match serde_json::to_string_pretty(&session.display_frame()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Serialization error: {}", e),
                }
                Ok(false)
            }
            "help" => {
                print_help();
                Ok(false)
            }
            "quit" | "exit" => break,
            other => {
                eprintln!("Unknown command '{}'. Type 'help' for commands.", other);
                Ok(false)
            }
        };

        match result {
            Ok(true) => session.notify(&mut sink),
            Ok(false) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

fn print_example_config() {
    let config = VisualizationConfig {
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Serialization error: {}", e),
    }
}
