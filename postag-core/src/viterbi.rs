//! # Busca do Melhor Caminho de Tags
//!
//! Dada uma sentença de palavras $w_1 \dots w_n$, procura a sequência de tags
//! que maximiza
//!
//! $$ P(t_1|\text{<S>}) \cdot \prod_{k} P(w_k|t_k) \cdot \prod_{k>1} P(t_k|t_{k-1}) \cdot P(\text{<E>}|t_n) $$
//!
//! Só entram na busca as tags já vistas com cada palavra no treino, e todo
//! caminho com probabilidade exatamente 0 é descartado.
//!
//! ## Estratégias
//!
//! - [`SearchStrategy::Viterbi`]: programação dinâmica. Para cada tag da
//!   posição atual guarda apenas o melhor score e o ponteiro para a tag
//!   anterior → `O(N × T²)`.
//! - [`SearchStrategy::Enumerate`]: enumera todos os caminhos com histórico
//!   completo → `O(T^N)` no pior caso. Mantida para reproduzir o comportamento
//!   da válvula de segurança sobre o número de caminhos.
//!
//! As duas devolvem o mesmo caminho: a soma dos logs é feita na mesma ordem
//! e o desempate é sempre "o primeiro visto vence".
//!
//! ## Log-space
//!
//! Os scores são guardados como $\ln p$, com $\ln 0 = -\infty$. O argmax não
//! muda e sentenças longas não sofrem underflow.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::hmm::HmmModel;
use crate::tagset::{TagId, TagSet};

/// Limite padrão de caminhos vivos numa posição.
pub const DEFAULT_MAX_PATHS: usize = 500_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Programação dinâmica com backpointers.
    #[default]
    Viterbi,
    /// Enumeração explícita de caminhos.
    Enumerate,
}

/// Uma hipótese de sequência de tags com sua probabilidade conjunta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathCandidate {
    tags: Vec<TagId>,
    log_prob: f64,
}

impl PathCandidate {
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// $\ln p$ do caminho.
    pub fn log_prob(&self) -> f64 {
        self.log_prob
    }

    /// Probabilidade linear (pode ser 0 por underflow em sentenças longas).
    pub fn probability(&self) -> f64 {
        self.log_prob.exp()
    }

    /// Rótulos das tags do caminho.
    pub fn labels<'a>(&self, tagset: &'a TagSet) -> Vec<&'a str> {
        self.tags.iter().map(|&t| tagset.label(t)).collect()
    }

    fn last(&self) -> TagId {
        self.tags[self.tags.len() - 1]
    }
}

/// Por que uma sentença não pôde ser etiquetada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unpredictable {
    EmptySentence,
    /// A palavra nunca apareceu no treino.
    UnknownWord { position: usize },
    /// Todos os caminhos chegaram a probabilidade 0 nesta posição.
    ZeroProbability { position: usize },
    /// Válvula de segurança: caminhos demais.
    TooManyPaths { position: usize, paths: usize },
    /// Nenhum caminho termina numa tag que possa preceder `<E>`.
    NoFinalTransition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Prediction {
    Tagged(PathCandidate),
    Unpredictable(Unpredictable),
}

impl Prediction {
    pub fn path(&self) -> Option<&PathCandidate> {
        match self {
            Prediction::Tagged(path) => Some(path),
            Prediction::Unpredictable(_) => None,
        }
    }
}

/// Célula da tabela Viterbi: melhor score até aqui terminando em `tag`.
#[derive(Debug, Clone, Copy)]
struct Cell {
    tag: TagId,
    log_prob: f64,
    /// Índice da célula anterior na coluna da posição anterior.
    backptr: usize,
}

fn ln(p: f64) -> f64 {
    if p > 0.0 {
        p.ln()
    } else {
        f64::NEG_INFINITY
    }
}

/// Preditor de sequências sobre um [`HmmModel`] treinado.
///
/// Apenas lê o modelo: pode ser reutilizado para quantas sentenças forem
/// necessárias, sempre com o mesmo resultado para a mesma entrada.
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'m> {
    model: &'m HmmModel,
    strategy: SearchStrategy,
    max_paths: usize,
}

impl<'m> Predictor<'m> {
    pub fn new(model: &'m HmmModel) -> Self {
        Self {
            model,
            strategy: SearchStrategy::default(),
            max_paths: DEFAULT_MAX_PATHS,
        }
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    pub fn model(&self) -> &'m HmmModel {
        self.model
    }

    /// Etiqueta a sequência de palavras `words`.
    pub fn predict<S: AsRef<str>>(&self, words: &[S]) -> Prediction {
        if words.is_empty() {
            return Prediction::Unpredictable(Unpredictable::EmptySentence);
        }
        match self.strategy {
            SearchStrategy::Viterbi => self.viterbi(words),
            SearchStrategy::Enumerate => self.enumerate(words),
        }
    }

    fn viterbi<S: AsRef<str>>(&self, words: &[S]) -> Prediction {
        let model = self.model;
        let mut columns: Vec<Vec<Cell>> = Vec::with_capacity(words.len());

        // === Inicialização e recursão ===
        for (position, word) in words.iter().enumerate() {
            let candidates = model.emissions(word.as_ref());
            if candidates.is_empty() {
                return Prediction::Unpredictable(Unpredictable::UnknownWord { position });
            }

            let mut column = Vec::with_capacity(candidates.len());
            for (tag, emission) in candidates {
                let emit = ln(emission);
                let best = match columns.last() {
                    None => Some((0, ln(model.transition(TagId::START, tag)) + emit)),
                    Some(prev) => {
                        let mut best: Option<(usize, f64)> = None;
                        for (j, cell) in prev.iter().enumerate() {
                            let score = cell.log_prob + emit + ln(model.transition(cell.tag, tag));
                            if best.map_or(true, |(_, s)| score > s) {
                                best = Some((j, score));
                            }
                        }
                        best
                    }
                };
                if let Some((backptr, log_prob)) = best {
                    if log_prob > f64::NEG_INFINITY {
                        column.push(Cell { tag, log_prob, backptr });
                    }
                }
            }

            if let Some(abort) = self.check_frontier(position, column.len()) {
                return abort;
            }
            columns.push(column);
        }

        // === Terminação ===
        let last = &columns[columns.len() - 1];
        let mut best: Option<(usize, f64)> = None;
        for (i, cell) in last.iter().enumerate() {
            let score = cell.log_prob + ln(model.transition(cell.tag, TagId::END));
            if score > f64::NEG_INFINITY && best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        let Some((mut idx, log_prob)) = best else {
            return Prediction::Unpredictable(Unpredictable::NoFinalTransition);
        };

        // === Backtracking ===
        let mut tags = vec![TagId::START; columns.len()];
        for (position, column) in columns.iter().enumerate().rev() {
            tags[position] = column[idx].tag;
            idx = column[idx].backptr;
        }

        Prediction::Tagged(PathCandidate { tags, log_prob })
    }

    fn enumerate<S: AsRef<str>>(&self, words: &[S]) -> Prediction {
        let model = self.model;
        let mut paths: Vec<PathCandidate> = Vec::new();

        for (position, word) in words.iter().enumerate() {
            let candidates = model.emissions(word.as_ref());
            if candidates.is_empty() {
                return Prediction::Unpredictable(Unpredictable::UnknownWord { position });
            }

            let mut extended = Vec::new();
            if position == 0 {
                for (tag, emission) in candidates {
                    let log_prob = ln(model.transition(TagId::START, tag)) + ln(emission);
                    if log_prob > f64::NEG_INFINITY {
                        extended.push(PathCandidate { tags: vec![tag], log_prob });
                    }
                }
            } else {
                // Tags por fora, caminhos por dentro: define a ordem de desempate
                for (tag, emission) in candidates {
                    let emit = ln(emission);
                    for path in &paths {
                        let log_prob = path.log_prob + emit + ln(model.transition(path.last(), tag));
                        if log_prob == f64::NEG_INFINITY {
                            continue;
                        }
                        let mut tags = Vec::with_capacity(path.tags.len() + 1);
                        tags.extend_from_slice(&path.tags);
                        tags.push(tag);
                        extended.push(PathCandidate { tags, log_prob });

                        // Aborta antes de materializar a explosão inteira
                        if extended.len() > self.max_paths {
                            break;
                        }
                    }
                    if extended.len() > self.max_paths {
                        break;
                    }
                }
            }

            if let Some(abort) = self.check_frontier(position, extended.len()) {
                return abort;
            }
            paths = extended;
        }

        // === Finalização: multiplica por P(<E> | última tag) ===
        let mut best: Option<PathCandidate> = None;
        for mut path in paths {
            path.log_prob += ln(model.transition(path.last(), TagId::END));
            if path.log_prob == f64::NEG_INFINITY {
                continue;
            }
            if best.as_ref().map_or(true, |b| path.log_prob > b.log_prob) {
                best = Some(path);
            }
        }

        match best {
            Some(path) => Prediction::Tagged(path),
            None => Prediction::Unpredictable(Unpredictable::NoFinalTransition),
        }
    }

    /// Fronteira vazia ou grande demais encerra a sentença.
    fn check_frontier(&self, position: usize, paths: usize) -> Option<Prediction> {
        if paths == 0 {
            return Some(Prediction::Unpredictable(Unpredictable::ZeroProbability { position }));
        }
        if paths > self.max_paths {
            warn!(
                "sentença abandonada na posição {position}: {paths} caminhos excedem o limite de {}",
                self.max_paths
            );
            return Some(Prediction::Unpredictable(Unpredictable::TooManyPaths { position, paths }));
        }
        None
    }
}
