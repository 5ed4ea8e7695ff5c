//! Interactive demo: load a grammar file, then parse each line of stdin
//! as a sentence against it, printing the resulting trees.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::rc::Rc;

use latchart::tree::Tree;
use latchart::{parse_sentence, tree, Category, Grammar};

/// Drops feature bindings from every node, for `--no-fs` display.
fn strip_features(t: &Tree) -> Tree {
  Tree {
    label: Category::new(t.label.name()),
    children: t.children.iter().map(strip_features).collect(),
  }
}

struct Args {
  grammar_path: String,
  top: String,
  show_chart: bool,
  show_features: bool,
}

fn parse_args() -> Result<Args, String> {
  let mut grammar_path = None;
  let mut top = "S".to_string();
  let mut show_chart = false;
  let mut show_features = true;

  let mut it = env::args().skip(1);
  while let Some(arg) = it.next() {
    match arg.as_str() {
      "-c" | "--chart" => show_chart = true,
      "-n" | "--no-fs" => show_features = false,
      "-t" | "--top" => {
        top = it.next().ok_or("--top requires a category name")?;
      }
      other if grammar_path.is_none() => grammar_path = Some(other.to_string()),
      other => return Err(format!("unexpected argument: {other}")),
    }
  }

  Ok(Args {
    grammar_path: grammar_path.ok_or("usage: latchart-cli [-c] [-n] [-t TOP] GRAMMAR_FILE")?,
    top,
    show_chart,
    show_features,
  })
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let args = match parse_args() {
    Ok(args) => args,
    Err(message) => {
      eprintln!("{message}");
      return ExitCode::FAILURE;
    }
  };

  let text = match fs::read_to_string(&args.grammar_path) {
    Ok(text) => text,
    Err(err) => {
      eprintln!("couldn't read {}: {err}", args.grammar_path);
      return ExitCode::FAILURE;
    }
  };

  let grammar: Grammar = match text.parse() {
    Ok(grammar) => grammar,
    Err(err) => {
      eprintln!("{}: {err}", args.grammar_path);
      return ExitCode::FAILURE;
    }
  };
  let grammar = Rc::new(grammar);
  let top = Category::new(&args.top);

  let stdin = io::stdin();
  print!("> ");
  let _ = io::stdout().flush();
  for line in stdin.lock().lines() {
    let Ok(line) = line else { break };
    let line = line.trim();
    if line.is_empty() {
      print!("> ");
      let _ = io::stdout().flush();
      continue;
    }

    let chart = parse_sentence(grammar.clone(), line);

    if args.show_chart {
      for edge in chart.edges() {
        println!("{edge}");
      }
      println!("---");
    }

    let solutions = chart.solutions(&top);
    if solutions.is_empty() {
      println!("(no parse)");
    } else {
      let mut memo = HashMap::new();
      for edge in &solutions {
        for parse in tree::trees(&chart, edge) {
          let parse = if args.show_features { parse } else { strip_features(&parse) };
          println!("{parse}");
        }
        println!("{} parse(s) for this edge", tree::count(&chart, edge, &mut memo));
      }
    }

    print!("> ");
    let _ = io::stdout().flush();
  }

  ExitCode::SUCCESS
}
