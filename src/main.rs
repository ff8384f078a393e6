use clap::{Parser, Subcommand};
use docimg::imaging::RustBackend;
use docimg::render::{ImageAttrs, render_image};
use docimg::{collect, config, generate, output, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docimg")]
#[command(about = "Collect, size and render documentation images")]
#[command(long_about = "\
Collect, size and render documentation images

Authors reference images by relative path. docimg copies every referenced
image into one flat public directory under a name derived from its path, and
rewrites each reference to that name plus the image's pixel size.

Project structure:

  project/
  ├── docimg.toml                  # Optional config
  ├── docs/
  │   ├── intro.mdx                # ![Logo](/logo.png)        → /logo.png#200x100
  │   ├── img/
  │   │   └── x.png                # bulk-copied as img-x.png
  │   └── guides/
  │       ├── setup.mdx            # ![](../img/x.png)         → /mdx-images/img-x.png#300x150
  │       └── img/step-1.png       # ![](./img/step-1.png)     → /mdx-images/guides-img-step-1.png#...
  └── public/
      ├── logo.png
      └── mdx-images/              # collected images land here

Run 'docimg gen-config' to print a documented docimg.toml.")]
#[command(version = env!("DOCIMG_VERSION"))]
struct Cli {
    /// Project root (holds docimg.toml; config paths are relative to it)
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy referenced and bulk images into the public image directory
    Collect,
    /// Compile documents into HTML pages with sized images
    Generate,
    /// Run collect, then generate
    Build,
    /// Scan the docs tree and report what would be collected
    Check {
        /// Print the scan manifest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render one (annotated) image reference as HTML
    Render {
        /// Reference, e.g. /mdx-images/img-x.png#300x150
        reference: String,
        /// Alt text
        #[arg(long)]
        alt: Option<String>,
    },
    /// Print a stock docimg.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let root = std::path::absolute(&cli.root)?;

    match cli.command {
        Command::Collect => {
            let config = config::load_config(&root)?;
            run_collect(&root, &config)?;
        }
        Command::Generate => {
            let config = config::load_config(&root)?;
            run_generate(&root, &config)?;
        }
        Command::Build => {
            let config = config::load_config(&root)?;
            println!("==> Collecting images");
            run_collect(&root, &config)?;
            println!("==> Generating pages");
            run_generate(&root, &config)?;
            println!("==> Build complete");
        }
        Command::Check { json } => {
            let config = config::load_config(&root)?;
            let paths = config.paths(&root);
            let manifest = scan::scan(&paths.docs_dir, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_scan_output(&manifest);
            }
        }
        Command::Render { reference, alt } => {
            let attrs = ImageAttrs {
                alt,
                ..Default::default()
            };
            println!("{}", render_image(Some(&reference), &attrs).into_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_collect(root: &Path, config: &config::DocsConfig) -> Result<(), Box<dyn std::error::Error>> {
    let paths = config.paths(root);
    let manifest = scan::scan(&paths.docs_dir, config)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let base = root.to_path_buf();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_collect_event(&event, &base);
        }
    });
    let report = collect::collect(
        &manifest,
        &paths.assets_dir,
        &config.collect.bulk_prefix,
        Some(tx),
    )?;
    printer.join().map_err(|_| "output thread panicked")?;

    output::print_collect_summary(&report, root);
    Ok(())
}

fn run_generate(
    root: &Path,
    config: &config::DocsConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool(&config.processing);
    let paths = config.paths(root);
    let manifest = scan::scan(&paths.docs_dir, config)?;
    let pages = generate::generate(&manifest, &paths, &config.asset_prefix, &RustBackend::new())?;
    output::print_generate_output(&pages, &paths.site_dir, root);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
