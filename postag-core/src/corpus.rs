//! # Corpus Anotado com Tags Morfossintáticas
//!
//! O corpus chega como texto delimitado, um token por linha:
//!
//! ```text
//! the;D
//! cat;N
//! sleeps;V
//! <E>;<E>
//! ```
//!
//! A leitura tem duas etapas:
//! 1. [`read_tagged_words`]: converte as linhas em pares (palavra, tag),
//!    descartando linhas incompletas.
//! 2. [`segment_sentences`]: agrupa os pares em sentenças usando uma
//!    [`SentenceBoundary`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{PosTagError, Result};

/// Um token com sua tag de referência.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedWord {
    pub word: String,
    pub tag: String,
}

impl TaggedWord {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Uma sentença anotada: sequência ordenada de [`TaggedWord`].
///
/// A ordem importa, pois é dela que saem as estatísticas de transição
/// entre tags vizinhas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub tokens: Vec<TaggedWord>,
}

impl Sentence {
    pub fn new(tokens: Vec<TaggedWord>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// As palavras observadas, na ordem.
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.word.as_str()).collect()
    }

    /// O caminho de tags de referência (gold).
    pub fn tags(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.tag.as_str()).collect()
    }
}

impl<W, T> FromIterator<(W, T)> for Sentence
where
    W: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (W, T)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(w, t)| TaggedWord::new(w, t)).collect())
    }
}

/// Como o fim de uma sentença é marcado no arquivo.
///
/// Existem duas convenções de corpus:
/// - **Marker**: uma linha sentinela (ex: `<E>;<E>`) separa as sentenças e
///   não pertence a nenhuma delas.
/// - **Terminal**: um token real (ex: `.;punct`) encerra a sentença e faz
///   parte dela.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SentenceBoundary {
    /// Fecha a sentença quando a palavra **ou** a tag é igual ao marcador.
    /// O marcador é consumido.
    Marker { word: String, tag: String },
    /// Fecha a sentença depois de um token cuja palavra **e** tag coincidem.
    /// O token permanece como último da sentença.
    Terminal { word: String, tag: String },
}

impl Default for SentenceBoundary {
    fn default() -> Self {
        SentenceBoundary::Marker {
            word: "<E>".to_string(),
            tag: "<E>".to_string(),
        }
    }
}

/// Formato do arquivo de corpus: delimitador de campos e convenção de fronteira.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusFormat {
    pub delimiter: char,
    pub boundary: SentenceBoundary,
}

impl Default for CorpusFormat {
    fn default() -> Self {
        Self {
            delimiter: ';',
            boundary: SentenceBoundary::default(),
        }
    }
}

pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() && delimiter != '\n' && delimiter != '\r' {
        Ok(delimiter as u8)
    } else {
        Err(PosTagError::invalid_argument(
            "delimiter",
            format!("{delimiter:?} não é um delimitador ASCII de uma linha"),
        ))
    }
}

/// Lê pares (palavra, tag) de um texto delimitado.
///
/// Não há cabeçalho nem aspas: aspas são tokens comuns. Linhas com menos de
/// dois campos, ou com palavra/tag vazias, são descartadas em silêncio.
/// Campos além do segundo são ignorados.
pub fn read_tagged_words<R: Read>(reader: R, delimiter: char) -> Result<Vec<TaggedWord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter_byte(delimiter)?)
        .from_reader(reader);

    let mut words = Vec::new();
    let mut dropped = 0usize;
    for record in rdr.records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(word), Some(tag)) if !word.is_empty() && !tag.is_empty() => {
                words.push(TaggedWord::new(word, tag));
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("{dropped} linhas incompletas descartadas");
    }
    Ok(words)
}

/// Abre `path` e lê seus pares (palavra, tag). Veja [`read_tagged_words`].
pub fn load_tagged_words<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Vec<TaggedWord>> {
    let fh = File::open(path)?;
    read_tagged_words(BufReader::new(fh), delimiter)
}

/// Agrupa pares (palavra, tag) em sentenças.
///
/// Sentenças vazias nunca são produzidas (marcadores consecutivos são
/// ignorados). Tokens depois da última fronteira não formam sentença e são
/// descartados.
pub fn segment_sentences<I>(words: I, boundary: &SentenceBoundary) -> Vec<Sentence>
where
    I: IntoIterator<Item = TaggedWord>,
{
    let mut sentences = Vec::new();
    let mut current: Vec<TaggedWord> = Vec::new();

    for tw in words {
        match boundary {
            SentenceBoundary::Marker { word, tag } => {
                if tw.word == *word || tw.tag == *tag {
                    if !current.is_empty() {
                        sentences.push(Sentence::new(std::mem::take(&mut current)));
                    }
                } else {
                    current.push(tw);
                }
            }
            SentenceBoundary::Terminal { word, tag } => {
                let closes = tw.word == *word && tw.tag == *tag;
                current.push(tw);
                if closes {
                    sentences.push(Sentence::new(std::mem::take(&mut current)));
                }
            }
        }
    }

    if !current.is_empty() {
        warn!(
            "{} tokens após a última fronteira de sentença foram descartados",
            current.len()
        );
    }

    sentences
}

/// Lê e segmenta um arquivo de corpus inteiro.
pub fn load_corpus<P: AsRef<Path>>(path: P, format: &CorpusFormat) -> Result<Vec<Sentence>> {
    let words = load_tagged_words(path, format.delimiter)?;
    Ok(segment_sentences(words, &format.boundary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn marker() -> SentenceBoundary {
        SentenceBoundary::default()
    }

    #[test]
    fn test_read_drops_incomplete_rows() {
        let text = "the;D\ncat\n;N\nsleeps;V\n\ndog;N;extra\n";
        let words = read_tagged_words(text.as_bytes(), ';').unwrap();
        assert_eq!(
            words,
            vec![
                TaggedWord::new("the", "D"),
                TaggedWord::new("sleeps", "V"),
                TaggedWord::new("dog", "N"),
            ]
        );
    }

    #[test]
    fn test_read_keeps_quotes_literal() {
        let text = "\";punct\nsaid;V\n";
        let words = read_tagged_words(text.as_bytes(), ';').unwrap();
        assert_eq!(words[0], TaggedWord::new("\"", "punct"));
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_read_with_tab_delimiter() {
        let text = "a\tD\r\ndog\tN\r\n";
        let words = read_tagged_words(text.as_bytes(), '\t').unwrap();
        assert_eq!(words, vec![TaggedWord::new("a", "D"), TaggedWord::new("dog", "N")]);
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let err = read_tagged_words("a§D".as_bytes(), '§').unwrap_err();
        assert!(matches!(err, PosTagError::InvalidArgument { arg: "delimiter", .. }));
    }

    #[test]
    fn test_marker_boundary_consumes_marker() {
        let words = vec![
            TaggedWord::new("the", "D"),
            TaggedWord::new("cat", "N"),
            TaggedWord::new("<E>", "<E>"),
            TaggedWord::new("<E>", "<E>"),
            TaggedWord::new("a", "D"),
            TaggedWord::new("dog", "N"),
            TaggedWord::new("<E>", "<E>"),
        ];
        let sentences = segment_sentences(words, &marker());
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].words(), vec!["the", "cat"]);
        assert_eq!(sentences[1].tags(), vec!["D", "N"]);
    }

    #[test]
    fn test_marker_matches_word_or_tag() {
        let words = vec![
            TaggedWord::new("x", "D"),
            TaggedWord::new("y", "<E>"),
            TaggedWord::new("z", "N"),
            TaggedWord::new("<E>", "punct"),
        ];
        let sentences = segment_sentences(words, &marker());
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].words(), vec!["x"]);
        assert_eq!(sentences[1].words(), vec!["z"]);
    }

    #[test]
    fn test_terminal_boundary_keeps_terminal_token() {
        let boundary = SentenceBoundary::Terminal {
            word: ".".into(),
            tag: "punct".into(),
        };
        let words = vec![
            TaggedWord::new("die", "d"),
            TaggedWord::new("pfarrer", "n"),
            TaggedWord::new(".", "punct"),
            TaggedWord::new("denen", "pro"),
            TaggedWord::new(".", "x"),
        ];
        let sentences = segment_sentences(words, &boundary);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].words(), vec!["die", "pfarrer", "."]);
    }

    #[test]
    fn test_unterminated_tail_is_discarded() {
        let words = vec![
            TaggedWord::new("a", "D"),
            TaggedWord::new("<E>", "<E>"),
            TaggedWord::new("dangling", "N"),
        ];
        let sentences = segment_sentences(words, &marker());
        assert_eq!(sentences, vec![Sentence::from_iter([("a", "D")])]);
    }

    #[test]
    fn test_load_corpus_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "the;D\ncat;N\nsleeps;V\n<E>;<E>\na;D\ndog;N\nbarks;V\n<E>;<E>\n").unwrap();

        let sentences = load_corpus(file.path(), &CorpusFormat::default()).unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].words(), vec!["a", "dog", "barks"]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_corpus("/nonexistent/corpus.txt", &CorpusFormat::default()).unwrap_err();
        assert!(matches!(err, PosTagError::Io(_)));
    }

    #[test]
    fn test_corpus_format_from_json() {
        let json = r#"{"delimiter": "\t", "boundary": {"kind": "terminal", "word": ".", "tag": "punct"}}"#;
        let format: CorpusFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format.delimiter, '\t');
        assert_eq!(
            format.boundary,
            SentenceBoundary::Terminal {
                word: ".".into(),
                tag: "punct".into()
            }
        );
    }
}
