use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use sejong::corpus::read_corpus;
use sejong::prelude::*;
use sejong::train::train;

/// A Korean part-of-speech tagger
#[derive(StructOpt)]
#[structopt(name = "sejong")]
enum Cli {
    /// Counts a tagged corpus and writes the log-probability tables
    Train {
        /// Path to the preprocessed Sejong corpus
        #[structopt(long = "data_path", parse(from_os_str))]
        data_path: PathBuf,

        /// Number of corpus lines to read; 0 reads the whole file
        #[structopt(long = "num_lines", default_value = "0")]
        num_lines: usize,

        /// Where to write the trained model artifact
        #[structopt(long = "save_path", parse(from_os_str))]
        save_path: PathBuf,
    },

    /// Tags a sentence with a trained model
    Tag {
        /// Path to the trained model artifact
        #[structopt(long = "json_path", parse(from_os_str))]
        json_path: PathBuf,

        /// Sentence to tag
        #[structopt(long = "text")]
        text: String,
    },
}

fn main() {
    let args = Cli::from_args();
    if let Err(err) = run(args) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(args: Cli) -> SejongResult<()> {
    match args {
        Cli::Train {
            data_path,
            num_lines,
            save_path,
        } => {
            println!("Data Loading...");
            let corpus = read_corpus(&data_path, num_lines)?;
            let trained = train(&corpus)?;

            println!("Data Saving...");
            trained.save(&save_path)?;
            println!("Save finished.");
        }
        Cli::Tag { json_path, text } => {
            let tagger = HmmTagger::from_path(&json_path)?;
            let tagged = tagger.tag(&text)?;
            let rendered: Vec<String> = tagged
                .iter()
                .map(|(morph, tag)| format!("{}/{}", morph, tagger.tag_name(*tag)))
                .collect();
            println!("{}", rendered.join(" "));
        }
    }
    Ok(())
}
