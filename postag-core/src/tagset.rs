//! # Vocabulário de Tags
//!
//! O conjunto de tags morfossintáticas é **aberto**: ele é derivado do corpus de
//! treino, ao contrário de um esquema fixo. A ele somam-se duas tags sintéticas
//! de fronteira:
//!
//! | Tag     | Significado                                     |
//! |---------|-------------------------------------------------|
//! | `<S>`   | Início de sentença (nada a precede)             |
//! | `<E>`   | Fim de sentença (nada a segue)                  |
//!
//! As tags de fronteira nunca co-ocorrem com uma palavra real. Elas são
//! identificadas por posição (índices 0 e 1), não pelo texto, então um corpus
//! que use literalmente `<S>` como tag não colide com elas.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

/// Rótulo exibido para a tag sintética de início.
pub const START_LABEL: &str = "<S>";
/// Rótulo exibido para a tag sintética de fim.
pub const END_LABEL: &str = "<E>";

/// Índice compacto de uma tag dentro de um [`TagSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TagId(usize);

impl TagId {
    /// Tag sintética que abre toda sentença.
    pub const START: TagId = TagId(0);
    /// Tag sintética que fecha toda sentença.
    pub const END: TagId = TagId(1);

    /// Índice numérico para as matrizes de transição.
    pub fn index(self) -> usize {
        self.0
    }

    /// `true` para `<S>` e `<E>`.
    pub fn is_boundary(self) -> bool {
        self == Self::START || self == Self::END
    }
}

/// Vocabulário de tags observado no treino, acrescido de `<S>` e `<E>`.
///
/// As tags reais ficam ordenadas lexicograficamente, o que torna a ordem de
/// iteração (e portanto o desempate na busca) determinística entre execuções.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    labels: Vec<String>,
    index: HashMap<String, TagId>,
}

impl TagSet {
    /// Constrói o vocabulário a partir das tags vistas no corpus (com repetições).
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = tags.into_iter().map(|t| t.as_ref().to_string()).collect();

        let mut labels = Vec::with_capacity(distinct.len() + 2);
        labels.push(START_LABEL.to_string());
        labels.push(END_LABEL.to_string());

        let mut index = HashMap::with_capacity(distinct.len());
        for tag in distinct {
            index.insert(tag.clone(), TagId(labels.len()));
            labels.push(tag);
        }

        Self { labels, index }
    }

    /// Número total de tags, incluindo as duas de fronteira.
    pub fn num_tags(&self) -> usize {
        self.labels.len()
    }

    /// Número de tags reais (sem `<S>`/`<E>`).
    pub fn real_len(&self) -> usize {
        self.labels.len() - 2
    }

    /// Procura uma tag real pelo rótulo.
    pub fn id(&self, label: &str) -> Option<TagId> {
        self.index.get(label).copied()
    }

    pub fn label(&self, id: TagId) -> &str {
        &self.labels[id.0]
    }

    /// Todas as tags, na ordem dos índices.
    pub fn ids(&self) -> impl Iterator<Item = TagId> {
        (0..self.labels.len()).map(TagId)
    }

    /// Apenas as tags reais, em ordem lexicográfica.
    pub fn real_ids(&self) -> impl Iterator<Item = TagId> {
        (2..self.labels.len()).map(TagId)
    }
}
