//! Tests for command-line parsing and the puzzle runner

#[cfg(test)]
mod tests {
    use clap::Parser;
    use log::LevelFilter;
    use shapefit::algorithm::ordering::ItemOrder;
    use shapefit::io::cli::{Cli, OrderArg, Runner};
    use shapefit::io::configuration::{DEFAULT_CELL_PIXELS, DEFAULT_SEED, DEFAULT_SLACK};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const PUZZLE: &str = "\
0:
#.
##

1:
###

3x2: 2 0
3x2: 1 1
3x3: 0 3
";

    fn write_puzzle(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("puzzle.txt");
        fs::write(&path, text).unwrap();
        path
    }

    fn cli_for(path: &Path, extra: &[&str]) -> Cli {
        let mut args = vec!["shapefit", path.to_str().unwrap(), "--quiet"];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    // Tests CLI parsing with only the required input argument
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program", "puzzle.txt"]);

        assert_eq!(cli.input, PathBuf::from("puzzle.txt"));
        assert_eq!(cli.slack, DEFAULT_SLACK);
        assert_eq!(cli.order, OrderArg::LargestFirst);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.node_limit, None);
        assert!(!cli.sequential);
        assert!(cli.render.is_none());
        assert_eq!(cli.cell_pixels, DEFAULT_CELL_PIXELS);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    // Tests CLI parsing with all available arguments
    // Verified by renaming long flags
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "input.txt",
            "--slack",
            "5",
            "--order",
            "shuffled",
            "--seed",
            "9",
            "--node-limit",
            "1000",
            "--sequential",
            "--render",
            "out",
            "--cell-pixels",
            "8",
            "--quiet",
        ]);

        assert_eq!(cli.slack, 5);
        assert_eq!(cli.order, OrderArg::Shuffled);
        assert_eq!(cli.seed, 9);
        assert_eq!(cli.node_limit, Some(1000));
        assert!(cli.sequential);
        assert_eq!(cli.render, Some(PathBuf::from("out")));
        assert_eq!(cli.cell_pixels, 8);
        assert!(cli.quiet);
    }

    // Tests short flag parsing
    // Verified by changing short flag definitions
    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "program", "input.txt", "-s", "3", "-o", "definition", "-n", "7", "-vv",
        ]);
        assert_eq!(cli.slack, 3);
        assert_eq!(cli.order, OrderArg::Definition);
        assert_eq!(cli.node_limit, Some(7));
        assert_eq!(cli.verbose, 2);
    }

    // Tests log level selection from quiet and verbose flags
    // Verified by letting verbose override quiet
    #[test]
    fn test_log_level() {
        let level = |args: &[&str]| {
            let mut full = vec!["program", "input.txt"];
            full.extend_from_slice(args);
            Cli::parse_from(full).log_level()
        };

        assert_eq!(level(&[]), LevelFilter::Warn);
        assert_eq!(level(&["-v"]), LevelFilter::Info);
        assert_eq!(level(&["-vvv"]), LevelFilter::Debug);
        assert_eq!(level(&["-q", "-vv"]), LevelFilter::Error);
    }

    // Tests progress display based on --quiet flag
    // Verified by inverting quiet flag logic
    #[test]
    fn test_should_show_progress() {
        assert!(Cli::parse_from(["program", "input.txt"]).should_show_progress());
        assert!(!Cli::parse_from(["program", "input.txt", "-q"]).should_show_progress());
    }

    // Tests solver configuration assembled from flags
    // Verified by ignoring the seed for shuffled order
    #[test]
    fn test_solver_config() {
        let cli = Cli::parse_from([
            "program",
            "input.txt",
            "--order",
            "shuffled",
            "--seed",
            "11",
            "--sequential",
            "-n",
            "50",
        ]);
        let config = cli.solver_config();

        assert_eq!(config.order, ItemOrder::Shuffled { seed: 11 });
        assert_eq!(config.node_limit, Some(50));
        assert_eq!(config.slack, DEFAULT_SLACK);
        assert!(!config.parallel);

        let cli = Cli::parse_from(["program", "input.txt", "-o", "definition"]);
        assert_eq!(cli.item_order(), ItemOrder::DefinitionOrder);
        assert!(cli.solver_config().parallel);
    }

    // Tests the runner counts feasible queries in a file
    // Verified by counting every solved query
    #[test]
    fn test_run_counts_feasible() {
        let dir = TempDir::new().unwrap();
        let path = write_puzzle(&dir, PUZZLE);

        let mut runner = Runner::new(cli_for(&path, &[]));
        assert!(runner.progress_manager().is_none());
        assert_eq!(runner.run().unwrap(), 2);

        let mut sequential = Runner::new(cli_for(&path, &["--sequential"]));
        assert_eq!(sequential.run().unwrap(), 2);
    }

    // Tests a progress manager is created unless quiet
    // Verified by never creating the progress manager
    #[test]
    fn test_run_with_progress() {
        let dir = TempDir::new().unwrap();
        let path = write_puzzle(&dir, PUZZLE);

        let mut runner = Runner::new(Cli::parse_from(["program", path.to_str().unwrap()]));
        assert!(runner.progress_manager().is_some());
        assert_eq!(runner.run().unwrap(), 2);
        assert_eq!(runner.progress_manager().map(|pm| pm.feasible()), Some(2));
    }

    // Tests error handling for missing files
    // Verified by treating a missing file as an empty puzzle
    #[test]
    fn test_run_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut runner = Runner::new(cli_for(&dir.path().join("absent.txt"), &[]));
        assert!(runner.run().is_err());
    }

    // Tests parse failures abort the run
    // Verified by skipping malformed lines
    #[test]
    fn test_run_invalid_puzzle() {
        let dir = TempDir::new().unwrap();
        let path = write_puzzle(&dir, "0:\n#?\n");
        let mut runner = Runner::new(cli_for(&path, &[]));
        assert!(runner.run().is_err());
    }

    // Tests rendering writes one image per feasible query
    // Verified by rendering infeasible queries as well
    #[test]
    fn test_run_renders_feasible_layouts() {
        let dir = TempDir::new().unwrap();
        let path = write_puzzle(&dir, PUZZLE);
        let out = dir.path().join("layouts");

        let mut runner = Runner::new(cli_for(&path, &["--render", out.to_str().unwrap()]));
        assert_eq!(runner.run().unwrap(), 2);

        assert!(Runner::get_render_path(&out, 0).exists());
        assert!(!Runner::get_render_path(&out, 1).exists());
        assert!(Runner::get_render_path(&out, 2).exists());
    }

    // Tests a zero cell size is rejected before solving
    // Verified by removing the cell size validation
    #[test]
    fn test_run_rejects_zero_cell_pixels() {
        let dir = TempDir::new().unwrap();
        let path = write_puzzle(&dir, PUZZLE);
        let mut runner = Runner::new(cli_for(&path, &["--cell-pixels", "0"]));
        assert!(runner.run().is_err());
    }

    // Tests render file naming
    // Verified by changing the render prefix
    #[test]
    fn test_render_path() {
        let path = Runner::get_render_path(Path::new("out"), 3);
        assert_eq!(path, PathBuf::from("out/query_3.png"));
    }
}
