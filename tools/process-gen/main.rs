use clap::Parser;
use nagare::process::{
    Action, ConnectionDefinition, Container, ContainerKind, HumanTask, NodeDefinition, NodeKind,
    ProcessDefinition, SubGraph, Timer, Variable, VariableScope, Work, WorkItem,
};
use rand::{Rng, rngs::ThreadRng};
use std::fs;

/// A CLI tool to generate synthetic process definitions for the nagare compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_process.json")]
    output: String,

    /// The minimum number of activities per container
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// The maximum number of activities per container
    #[arg(long, default_value_t = 8)]
    max: usize,

    /// How deep composite containers may nest
    #[arg(long, default_value_t = 3)]
    depth: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    println!(
        "Generating new process (activities per container: {} to {}, depth {})...",
        cli.min, cli.max, cli.depth
    );

    let mut generator = Generator {
        rng: &mut rng,
        min: cli.min,
        max: cli.max,
        next_id: 0,
    };
    let process = generator.process(cli.depth);

    fs::write(&cli.output, process.to_json()?)?;
    println!(
        "Successfully generated and saved process '{}' to '{}'",
        process.id, cli.output
    );

    Ok(())
}

struct Generator<'r> {
    rng: &'r mut ThreadRng,
    min: usize,
    max: usize,
    next_id: usize,
}

impl Generator<'_> {
    fn process(&mut self, depth: usize) -> ProcessDefinition {
        let mut process = ProcessDefinition::new("org.nagare.generated", "Generated");
        process.version = Some("1.0".to_string());
        process.variables = self.variables("process");
        let graph = self.chain(depth, true);
        process.nodes = graph.nodes;
        process.connections = graph.connections;
        println!("-> Generated {} node(s).", self.next_id);
        process
    }

    /// A start node, a random run of activities and an end node, connected in
    /// sequence.
    fn chain(&mut self, depth: usize, top_level: bool) -> SubGraph {
        let mut nodes = vec![NodeDefinition::new(
            &self.id(),
            "",
            NodeKind::Start {
                interrupting: true,
                event: None,
            },
        )];
        let count = self.rng.random_range(self.min..=self.max);
        for _ in 0..count {
            let activity = self.activity(depth);
            nodes.push(activity);
        }
        nodes.push(NodeDefinition::new(
            &self.id(),
            "",
            NodeKind::End {
                terminate: top_level,
            },
        ));

        let connections = nodes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| ConnectionDefinition::new(&format!("c{}", i), &pair[0].id, &pair[1].id))
            .collect();
        let variables = if top_level || self.rng.random_bool(0.5) {
            VariableScope::default()
        } else {
            self.variables("local")
        };

        SubGraph {
            variables,
            nodes,
            connections,
        }
    }

    fn activity(&mut self, depth: usize) -> NodeDefinition {
        let id = self.id();
        let choice = if depth == 0 {
            self.rng.random_range(0..4)
        } else {
            self.rng.random_range(0..5)
        };
        let kind = match choice {
            0 => NodeKind::HumanTask(HumanTask {
                work: Work::new(&format!("task_{}", self.rng.random_range(0..5))),
                swimlane: Some("reviewers".to_string()),
                ..HumanTask::default()
            }),
            1 => NodeKind::WorkItem(WorkItem {
                work: Work::new("Service Task")
                    .with_parameter("Interface", "org.nagare.generated.Service")
                    .with_parameter("Operation", &format!("op{}", id))
                    .with_parameter("ParameterType", "java.lang.String"),
                ..WorkItem::default()
            }),
            2 => NodeKind::Action {
                action: Action::Script {
                    dialect: "java".to_string(),
                    script: "System.out.println(process_0);".to_string(),
                },
            },
            3 => NodeKind::Timer {
                timer: Timer::duration(&format!("PT{}S", self.rng.random_range(1..60))),
            },
            _ => NodeKind::Container(Container {
                kind: ContainerKind::Composite,
                autocomplete: true,
                graph: self.chain(depth - 1, false),
            }),
        };
        NodeDefinition::new(&id, "", kind)
    }

    fn variables(&mut self, prefix: &str) -> VariableScope {
        let count = self.rng.random_range(1..=4);
        (0..count)
            .map(|i| Variable::new(&format!("{}_{}", prefix, i), "java.lang.String"))
            .collect()
    }

    fn id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}
