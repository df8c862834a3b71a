//! The `quizrace init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizrace.toml
    if std::path::Path::new("quizrace.toml").exists() {
        println!("quizrace.toml already exists, skipping.");
    } else {
        std::fs::write("quizrace.toml", SAMPLE_CONFIG)?;
        println!("Created quizrace.toml");
    }

    // Create example question file
    let problems_path = std::path::Path::new("problems.csv");
    if problems_path.exists() {
        println!("problems.csv already exists, skipping.");
    } else {
        std::fs::write(problems_path, EXAMPLE_PROBLEMS)?;
        println!("Created problems.csv");
    }

    println!("\nNext steps:");
    println!("  1. Edit problems.csv with your own questions");
    println!("  2. Run: quizrace validate --problems problems.csv");
    println!("  3. Run: quizrace run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrace configuration

problems = "problems.csv"
time_limit_secs = 300
has_headers = false
delimiter = ","

# Fix the question order between runs
# seed = 42

# Write a JSON report for every session
# output_dir = "./quizrace-results"
"#;

const EXAMPLE_PROBLEMS: &str = "5+5,10
7+3,10
1+1,2
8+3,11
1+2,3
8+6,14
3+1,4
1+4,5
5+1,6
2+3,5
3+3,6
2+4,6
5+2,7
\"what 2+2, sir?\",4
";
