use narwhal::{Envelope, GraphInput, GraphOutput, Objective, ScratchArena};
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Narwhal(narwhal::Error),
    OutOfSpace { required: usize },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Narwhal(err) => write!(f, "{err}"),
            CliError::OutOfSpace { required } => write!(
                f,
                "scratch arena too small: rerun with --scratch {required} (or without --no-retry)"
            ),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        match value {
            narwhal::Error::NoSpace { required } => Self::OutOfSpace { required },
            other => Self::Narwhal(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Order,
    Measure,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    objective: Objective,
    scratch: Option<usize>,
    retry: bool,
    pretty: bool,
}

/// Either the adjacency form or a plain undirected edge list with 1-based endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphDoc {
    Adjacency(GraphInput),
    Edges {
        node_count: usize,
        edges: Vec<(usize, usize)>,
    },
}

impl GraphDoc {
    fn into_input(self) -> Result<GraphInput, CliError> {
        match self {
            GraphDoc::Adjacency(input) => Ok(input),
            GraphDoc::Edges { node_count, edges } => {
                Ok(GraphInput::from_edges(node_count, &edges)?)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MeasureDoc {
    #[serde(flatten)]
    graph: GraphDoc,
    permutation: Vec<usize>,
}

#[derive(Serialize)]
struct OrderOut<'a> {
    objective: Objective,
    node_count: usize,
    /// Old node ids in their new order.
    order: Vec<usize>,
    #[serde(flatten)]
    output: &'a GraphOutput,
}

#[derive(Serialize)]
struct MeasureOut {
    node_count: usize,
    #[serde(flatten)]
    envelope: Envelope,
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [order] [--objective bandwidth|profile] [--scratch <words>] [--no-retry] [--pretty] [<path>|-]\n\
  narwhal-cli measure [--pretty] [<path>|-]\n\
\n\
INPUT:\n\
  A JSON graph, either {\"node_count\", \"degree\", \"adjacency_start\", \"adjacency\"}\n\
  or {\"node_count\": n, \"edges\": [[a, b], ...]} with 1-based node ids.\n\
  `measure` additionally reads a \"permutation\" array (new 1-based index per node).\n\
\n\
NOTES:\n\
  - The scratch arena defaults to 4 words per node. When it runs out, `order` retries once\n\
    with the size the library asks for unless --no-retry is given (exit code 3).\n\
  - Set NARWHAL_TIMING=1 to print a per-phase timing line to stderr.\n"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        retry: true,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "order" => args.command = Command::Order,
            "measure" => args.command = Command::Measure,
            "--pretty" => args.pretty = true,
            "--no-retry" => args.retry = false,
            "--objective" => {
                let Some(objective) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.objective = objective
                    .parse::<Objective>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scratch" => {
                let Some(words) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scratch = Some(words.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.peek().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn order(input: &GraphInput, args: &Args) -> Result<GraphOutput, CliError> {
    let mut scratch = match args.scratch {
        Some(words) => ScratchArena::with_capacity(words),
        None => ScratchArena::new(input.node_count),
    };
    match narwhal::reorder(input, args.objective, &mut scratch) {
        Err(narwhal::Error::NoSpace { required }) if args.retry => {
            eprintln!(
                "scratch arena of {} words was too small; retrying with {required}",
                scratch.capacity()
            );
            let mut scratch = ScratchArena::with_capacity(required);
            Ok(narwhal::reorder(input, args.objective, &mut scratch)?)
        }
        other => Ok(other?),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    match args.command {
        Command::Order => {
            let input = serde_json::from_str::<GraphDoc>(&text)?.into_input()?;
            let output = order(&input, &args)?;
            write_json(
                &OrderOut {
                    objective: args.objective,
                    node_count: input.node_count,
                    order: output.inverse(),
                    output: &output,
                },
                args.pretty,
            )
        }
        Command::Measure => {
            let doc: MeasureDoc = serde_json::from_str(&text)?;
            let input = doc.graph.into_input()?;
            let envelope = narwhal::measure(&input, &doc.permutation)?;
            write_json(
                &MeasureOut {
                    node_count: input.node_count,
                    envelope,
                },
                args.pretty,
            )
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::OutOfSpace { .. }) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
