use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cases::{self, TraversalCase};
use crate::output::{render_to_string, render_tree, RenderOptions, MAX_GAP};
use crate::tree::{reconstruct, BinaryTree, Reconstruction, TreeError};

/// In-order traversal of the built-in sample tree
pub const SAMPLE_INORDER: [i32; 10] = [9, 3, 1, 0, 4, 2, 7, 6, 8, 5];
/// Post-order traversal of the built-in sample tree
pub const SAMPLE_POSTORDER: [i32; 10] = [9, 1, 4, 0, 3, 6, 7, 5, 8, 2];

/// Treeweave - rebuild binary trees from in-order and post-order traversals
#[derive(Parser)]
#[command(name = "treeweave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct and draw the built-in sample tree
    Demo {
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Reconstruct a tree from two comma-separated traversals
    Build {
        /// In-order traversal, e.g. 9,3,1,0,4
        #[arg(
            long,
            value_delimiter = ',',
            allow_hyphen_values = true,
            required = true
        )]
        inorder: Vec<i32>,

        /// Post-order traversal, e.g. 9,1,4,0,3
        #[arg(
            long,
            value_delimiter = ',',
            allow_hyphen_values = true,
            required = true
        )]
        postorder: Vec<i32>,

        /// Also write the diagram to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Check every case in a TOML case file, or in all case files under a directory
    Check {
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Write a diagram for each consistent case into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(clap::Args, Debug, Default)]
struct RenderArgs {
    /// Minimum gap between sibling subtrees (0-100)
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=i64::from(MAX_GAP)))]
    gap: Option<i32>,

    /// Rows to draw before truncating the diagram
    #[arg(long)]
    max_height: Option<usize>,

    /// Skip the ASCII diagram
    #[arg(long)]
    no_diagram: bool,
}

impl RenderArgs {
    fn options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            gap: self.gap.unwrap_or(defaults.gap),
            max_height: self.max_height.unwrap_or(defaults.max_height),
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        match self.command {
            Commands::Demo { render } => {
                build_tree(&SAMPLE_INORDER, &SAMPLE_POSTORDER, None, &render)
            }
            Commands::Build {
                inorder,
                postorder,
                output,
                render,
            } => build_tree(&inorder, &postorder, output.as_deref(), &render),
            Commands::Check {
                path,
                output,
                render,
            } => check_cases(&path, output.as_deref(), &render),
        }
    }
}

fn build_tree(
    inorder: &[i32],
    postorder: &[i32],
    output: Option<&Path>,
    render: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("In-order input:   {}", join(inorder));
    println!("Post-order input: {}", join(postorder));

    let result = match reconstruct(inorder, postorder) {
        Ok(result) => result,
        Err(e) => {
            println!("\nVerdict: inconsistent, {}", e);
            return Err(e.into());
        }
    };
    let options = render.options();

    print_report(&result, &options, render.no_diagram);

    if let Some(path) = output {
        render_tree(&result.tree, &options, path)?;
        println!("Wrote diagram to: {:?}", path);
    }

    result.into_verified()?;
    Ok(())
}

fn print_report(result: &Reconstruction, options: &RenderOptions, no_diagram: bool) {
    match &result.mismatch {
        None => println!("\nVerdict: consistent, both traversals describe the same tree"),
        Some(mismatch) => println!("\nVerdict: inconsistent, {}", mismatch),
    }

    println!("\nIn-order traversal of the constructed tree:");
    println!("{}", join(&result.inorder));
    println!("\nPost-order traversal of the constructed tree:");
    println!("{}", join(&result.postorder));

    if !no_diagram {
        println!("\nASCII representation of the tree:");
        print!("{}", render_to_string(&result.tree, options));
    }
}

fn check_cases(
    path: &Path,
    output_dir: Option<&Path>,
    render: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = cases::discover(path)?;

    let mut total = 0;
    let mut failed = 0;

    for file in &files {
        println!("{}", file.path.display());
        let options = file.render_options(render.gap, render.max_height);

        for case in &file.cases {
            total += 1;
            match check_case(case) {
                Ok(tree) => {
                    println!("  ok    {}", case.name);
                    if !render.no_diagram {
                        if let Some(dir) = output_dir {
                            let target = dir.join(format!("{}.txt", to_file_stem(&case.name)));
                            render_tree(&tree, &options, &target)?;
                            info!(case = %case.name, path = ?target, "wrote diagram");
                        }
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!(case = %case.name, error = %e, "inconsistent traversals");
                    println!("  FAIL  {}: {}", case.name, e);
                }
            }
        }
    }

    println!("Checked {} cases, {} inconsistent", total, failed);

    if failed > 0 {
        return Err(format!("{} of {} cases are inconsistent", failed, total).into());
    }

    Ok(())
}

fn check_case(case: &TraversalCase) -> Result<BinaryTree, TreeError> {
    reconstruct(&case.inorder, &case.postorder)?.into_verified()
}

fn join(values: &[i32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a case name into a file stem: lowercase, runs of other characters become `_`
fn to_file_stem(name: &str) -> String {
    let mut result = String::new();

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            result.push(c.to_ascii_lowercase());
        } else if !result.ends_with('_') {
            result.push('_');
        }
    }

    let trimmed = result.trim_matches('_');
    if trimmed.is_empty() {
        "case".to_string()
    } else {
        trimmed.to_string()
    }
}
