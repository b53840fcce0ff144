//! # Hidden Markov Model (HMM) Bigrama para Tags Morfossintáticas
//!
//! Implementação clássica de HMM onde:
//! - **Estados Ocultos**: Tags (D, N, V, ...) mais `<S>` e `<E>`
//! - **Observações**: Palavras
//!
//! O modelo aprende, por máxima verossimilhança e **sem suavização**:
//! 1. Probabilidade de Transição: $P(t_j | t_i) = C(t_i, t_j) / C(t_i)$
//! 2. Probabilidade de Emissão: $P(w | t) = C(w, t) / C(t)$
//!
//! Pares nunca vistos valem exatamente 0. É esse zero que a busca usa para
//! podar caminhos impossíveis.
//!
//! As transições são contadas sobre cada sentença **entre colchetes**:
//! `<S> t_1 ... t_n <E>`. As emissões são contadas sobre os tokens reais.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::corpus::Sentence;
use crate::tagset::{TagId, TagSet};

/// Tabela quadrada de $P(t_j | t_i)$ sobre vocabulário ∪ {`<S>`, `<E>`}.
///
/// Linhas indexadas pela tag de origem, colunas pela tag de destino.
/// Entradas com origem `<E>` ou destino `<S>` são sempre 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionTable {
    size: usize,
    probs: Vec<f64>,
}

impl TransitionTable {
    /// $P(to | from)$.
    pub fn get(&self, from: TagId, to: TagId) -> f64 {
        self.probs[from.index() * self.size + to.index()]
    }

    /// Linha inteira da tag de origem `from`.
    pub fn row(&self, from: TagId) -> &[f64] {
        let start = from.index() * self.size;
        &self.probs[start..start + self.size]
    }
}

/// Modelo HMM treinado. Imutável depois de [`HmmModel::train`].
#[derive(Debug, Clone)]
pub struct HmmModel {
    tagset: TagSet,
    transitions: TransitionTable,
    /// $C(t)$ sobre os tokens reais. Zero para `<S>`/`<E>`.
    tag_counts: Vec<u32>,
    /// $C(w, t)$: para cada palavra, as tags com que foi vista (ordenadas por índice).
    lexicon: HashMap<String, Vec<(TagId, u32)>>,
}

impl HmmModel {
    /// Estima o modelo a partir das sentenças de treino.
    ///
    /// # Processo
    /// 1. **Vocabulário**: coleta as tags distintas e acrescenta `<S>`/`<E>`.
    /// 2. **Contagem**: percorre cada sentença contando $C(w, t)$, $C(t)$ e os
    ///    bigramas de tags da sequência entre colchetes.
    /// 3. **Normalização**: divide cada bigrama pela contagem da tag de origem,
    ///    forçando os zeros estruturais.
    pub fn train(corpus: &[Sentence]) -> Self {
        let tagset = TagSet::from_tags(corpus.iter().flat_map(|s| s.tokens.iter().map(|t| &t.tag)));
        let n = tagset.num_tags();

        let mut tag_counts = vec![0u32; n];
        // C(t) sobre a sequência entre colchetes, denominador das transições
        let mut bracketed_counts = vec![0u32; n];
        let mut bigram_counts = vec![0u32; n * n];
        let mut lexicon_counts: HashMap<String, HashMap<TagId, u32>> = HashMap::new();

        // 1. Contagem das frequências brutas
        for sentence in corpus {
            for tw in &sentence.tokens {
                // Toda tag do corpus está no vocabulário, construído do mesmo corpus
                let Some(tag) = tagset.id(&tw.tag) else { continue };
                tag_counts[tag.index()] += 1;
                *lexicon_counts
                    .entry(tw.word.clone())
                    .or_default()
                    .entry(tag)
                    .or_insert(0) += 1;
            }

            let tags = bracketed(sentence, &tagset);
            for (i, tag) in tags.iter().enumerate() {
                bracketed_counts[tag.index()] += 1;
                if let Some(next) = tags.get(i + 1) {
                    bigram_counts[tag.index() * n + next.index()] += 1;
                }
            }
        }

        // 2. Normalização das transições
        let mut probs = vec![0.0; n * n];
        for from in tagset.ids() {
            let denom = bracketed_counts[from.index()];
            if from == TagId::END || denom == 0 {
                continue;
            }
            for to in tagset.ids() {
                if to == TagId::START {
                    continue;
                }
                let count = bigram_counts[from.index() * n + to.index()];
                probs[from.index() * n + to.index()] = count as f64 / denom as f64;
            }
        }

        let lexicon = lexicon_counts
            .into_iter()
            .map(|(word, counts)| {
                let mut counts: Vec<(TagId, u32)> = counts.into_iter().collect();
                counts.sort_by_key(|&(tag, _)| tag);
                (word, counts)
            })
            .collect::<HashMap<_, _>>();

        info!(
            "modelo HMM treinado: {} sentenças, {} tags, {} palavras distintas",
            corpus.len(),
            tagset.real_len(),
            lexicon.len()
        );

        Self {
            tagset,
            transitions: TransitionTable { size: n, probs },
            tag_counts,
            lexicon,
        }
    }

    pub fn tagset(&self) -> &TagSet {
        &self.tagset
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// $P(to | from)$.
    pub fn transition(&self, from: TagId, to: TagId) -> f64 {
        self.transitions.get(from, to)
    }

    /// $P(word | tag) = C(word, tag) / C(tag)$.
    ///
    /// Zero para pares nunca vistos, para `<S>`/`<E>` e para tags sem ocorrência.
    pub fn emission(&self, word: &str, tag: TagId) -> f64 {
        let tag_count = self.tag_counts[tag.index()];
        if tag.is_boundary() || tag_count == 0 {
            return 0.0;
        }
        self.lexicon
            .get(word)
            .and_then(|counts| counts.iter().find(|&&(t, _)| t == tag))
            .map_or(0.0, |&(_, c)| c as f64 / tag_count as f64)
    }

    /// Tags distintas já vistas com `word`. Vazio significa palavra fora do vocabulário.
    pub fn candidate_tags(&self, word: &str) -> Vec<TagId> {
        self.lexicon
            .get(word)
            .map(|counts| counts.iter().map(|&(tag, _)| tag).collect())
            .unwrap_or_default()
    }

    /// Tags candidatas de `word` já com a emissão calculada.
    ///
    /// Equivale a chamar [`HmmModel::emission`] para cada tag de
    /// [`HmmModel::candidate_tags`], mas com uma única consulta ao léxico.
    pub fn emissions(&self, word: &str) -> Vec<(TagId, f64)> {
        self.lexicon
            .get(word)
            .map(|counts| {
                counts
                    .iter()
                    .map(|&(tag, c)| (tag, c as f64 / self.tag_counts[tag.index()] as f64))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Número de palavras distintas vistas no treino.
    pub fn vocabulary_size(&self) -> usize {
        self.lexicon.len()
    }
}

/// Sequência `<S> t_1 ... t_n <E>` de uma sentença, sem alterar a sentença.
fn bracketed(sentence: &Sentence, tagset: &TagSet) -> Vec<TagId> {
    std::iter::once(TagId::START)
        .chain(sentence.tokens.iter().filter_map(|tw| tagset.id(&tw.tag)))
        .chain(std::iter::once(TagId::END))
        .collect()
}
