//! # Divisão Treino/Teste
//!
//! Embaralha as sentenças e separa uma fração para treino. Com uma semente
//! fixa a divisão é reprodutível entre execuções.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::corpus::Sentence;
use crate::errors::{PosTagError, Result};

/// Proporção padrão de sentenças de treino (8:2).
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

pub(crate) fn check_ratio(ratio: f64) -> Result<()> {
    if ratio.is_finite() && (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(PosTagError::invalid_argument(
            "train_ratio",
            format!("{ratio} está fora de [0, 1]"),
        ))
    }
}

/// Separa `sentences` em `(treino, teste)`.
///
/// O treino recebe $\lceil n \cdot ratio \rceil$ sentenças. O vetor é consumido,
/// portanto embaralhar não afeta nenhuma outra cópia do corpus.
pub fn split_train_test(
    mut sentences: Vec<Sentence>,
    ratio: f64,
    seed: Option<u64>,
) -> Result<(Vec<Sentence>, Vec<Sentence>)> {
    check_ratio(ratio)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    sentences.shuffle(&mut rng);

    let split_at = ((sentences.len() as f64 * ratio).ceil() as usize).min(sentences.len());
    let test = sentences.split_off(split_at);
    Ok((sentences, test))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<Sentence> {
        (0..n)
            .map(|i| Sentence::from_iter([(format!("w{i}"), "N")]))
            .collect()
    }

    #[test]
    fn test_split_sizes_round_up() {
        let (train, test) = split_train_test(numbered(10), 0.8, Some(1)).unwrap();
        assert_eq!((train.len(), test.len()), (8, 2));

        let (train, test) = split_train_test(numbered(7), 0.8, Some(1)).unwrap();
        // ceil(5.6) = 6
        assert_eq!((train.len(), test.len()), (6, 1));

        let (train, test) = split_train_test(numbered(3), 0.0, None).unwrap();
        assert_eq!((train.len(), test.len()), (0, 3));

        let (train, test) = split_train_test(numbered(3), 1.0, None).unwrap();
        assert_eq!((train.len(), test.len()), (3, 0));
    }

    #[test]
    fn test_split_is_deterministic_with_seed() {
        let a = split_train_test(numbered(50), 0.8, Some(469283984701)).unwrap();
        let b = split_train_test(numbered(50), 0.8, Some(469283984701)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_is_a_partition() {
        let (mut train, test) = split_train_test(numbered(20), 0.5, Some(7)).unwrap();
        train.extend(test);
        let mut words: Vec<String> = train.iter().map(|s| s.tokens[0].word.clone()).collect();
        words.sort();
        let mut expected: Vec<String> = (0..20).map(|i| format!("w{i}")).collect();
        expected.sort();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_split_rejects_bad_ratio() {
        for ratio in [-0.1, 1.5, f64::NAN] {
            let err = split_train_test(numbered(3), ratio, None).unwrap_err();
            assert!(matches!(err, PosTagError::InvalidArgument { arg: "train_ratio", .. }));
        }
    }
}
