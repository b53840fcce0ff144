//! Linha de comando: treina e avalia o etiquetador HMM sobre um corpus anotado

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use postag_core::{
    load_corpus, Experiment, ExperimentConfig, ExperimentReport, SearchStrategy, SentenceBoundary,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "postag",
    about = "Treina um HMM bigrama sobre um corpus com tags POS e mede a acurácia da predição."
)]
struct Args {
    /// Corpus delimitado, um par palavra/tag por linha
    #[arg(long)]
    corpus: PathBuf,

    /// Arquivo JSON com a configuração; as opções abaixo têm precedência
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delimitador dos campos
    #[arg(long)]
    delimiter: Option<char>,

    /// Palavra que marca o fim de sentença
    #[arg(long)]
    boundary_word: Option<String>,

    /// Tag que marca o fim de sentença
    #[arg(long)]
    boundary_tag: Option<String>,

    /// O marcador de fim é um token real e fica na sentença (ex: ".;punct")
    #[arg(long)]
    terminal_boundary: bool,

    /// Fração das sentenças usada no treino
    #[arg(long)]
    ratio: Option<f64>,

    /// Semente do embaralhamento, para divisões reprodutíveis
    #[arg(long)]
    seed: Option<u64>,

    /// Número de divisões aleatórias cuja média é reportada
    #[arg(long)]
    phases: Option<usize>,

    /// Estratégia de busca: {viterbi, enumerate}
    #[arg(long, value_parser = parse_search)]
    search: Option<SearchStrategy>,

    /// Máximo de caminhos vivos antes de abandonar uma sentença
    #[arg(long)]
    max_paths: Option<usize>,

    /// Imprime o relatório completo em JSON
    #[arg(long)]
    json: bool,
}

fn parse_search(s: &str) -> Result<SearchStrategy, String> {
    match s {
        "viterbi" => Ok(SearchStrategy::Viterbi),
        "enumerate" => Ok(SearchStrategy::Enumerate),
        _ => Err(format!("estratégia desconhecida: {s}")),
    }
}

impl Args {
    /// Arquivo de configuração (ou padrões) sobrescrito pelas opções da linha de comando.
    fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_json_file(path)
                .with_context(|| format!("lendo a configuração {}", path.display()))?,
            None => ExperimentConfig::default(),
        };

        if let Some(delimiter) = self.delimiter {
            config.corpus.delimiter = delimiter;
        }
        if self.boundary_word.is_some() || self.boundary_tag.is_some() || self.terminal_boundary {
            // O tipo vem do arquivo, a menos que --terminal-boundary o force
            let (word, tag, terminal) = match &config.corpus.boundary {
                SentenceBoundary::Marker { word, tag } => (word.clone(), tag.clone(), false),
                SentenceBoundary::Terminal { word, tag } => (word.clone(), tag.clone(), true),
            };
            let word = self.boundary_word.clone().unwrap_or(word);
            let tag = self.boundary_tag.clone().unwrap_or(tag);
            config.corpus.boundary = if terminal || self.terminal_boundary {
                SentenceBoundary::Terminal { word, tag }
            } else {
                SentenceBoundary::Marker { word, tag }
            };
        }
        if let Some(ratio) = self.ratio {
            config.train_ratio = ratio;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(phases) = self.phases {
            config.phases = phases;
        }
        if let Some(search) = self.search {
            config.search = search;
        }
        if let Some(max_paths) = self.max_paths {
            config.max_paths = max_paths;
        }
        Ok(config)
    }
}

fn print_report(report: &ExperimentReport) {
    println!("Sentence Prediction Accuracy: {}%", report.sentence_accuracy * 100.0);
    println!("Tag Prediction Accuracy: {}%", report.tag_accuracy * 100.0);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.experiment_config()?;
    let experiment = Experiment::new(config).context("configuração inválida")?;

    info!("carregando {}", args.corpus.display());
    let sentences = load_corpus(&args.corpus, &experiment.config().corpus)
        .with_context(|| format!("lendo o corpus {}", args.corpus.display()))?;
    info!("{} sentenças carregadas", sentences.len());

    let report = experiment.run(&sentences)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
