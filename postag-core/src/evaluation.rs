//! # Avaliação de Acurácia
//!
//! Compara o caminho previsto com o caminho de referência de cada sentença e
//! agrega duas métricas:
//!
//! - **Acurácia de sentenças**: sentenças com todas as tags corretas / total de sentenças.
//! - **Acurácia de tags**: tags corretas / total de tokens.
//!
//! ## Sentenças imprevisíveis
//!
//! Uma sentença sem caminho (palavra desconhecida, probabilidade zero ou
//! válvula de segurança) **não soma nada** aos numeradores, mas continua nos
//! dois denominadores.

use serde::{Deserialize, Serialize};

use crate::corpus::Sentence;
use crate::tagset::TagSet;
use crate::viterbi::{Prediction, Predictor, Unpredictable};

/// Resultado da comparação de uma sentença.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SentenceOutcome {
    /// Todas as tags corretas.
    Exact { tokens: usize },
    /// Crédito parcial: `correct` de `tokens` tags corretas.
    Partial { correct: usize, tokens: usize },
    /// Sem caminho previsto; a sentença é pulada.
    Skipped { tokens: usize, reason: Unpredictable },
}

impl SentenceOutcome {
    /// Compara uma predição com as tags de referência.
    pub fn compare(prediction: &Prediction, tagset: &TagSet, gold: &[&str]) -> Self {
        let tokens = gold.len();
        let path = match prediction {
            Prediction::Tagged(path) => path,
            Prediction::Unpredictable(reason) => {
                return SentenceOutcome::Skipped {
                    tokens,
                    reason: *reason,
                }
            }
        };

        let predicted = path.labels(tagset);
        let correct = predicted.iter().zip(gold).filter(|(p, g)| p == g).count();
        if correct == tokens && predicted.len() == tokens {
            SentenceOutcome::Exact { tokens }
        } else {
            SentenceOutcome::Partial { correct, tokens }
        }
    }

    pub fn tokens(&self) -> usize {
        match *self {
            SentenceOutcome::Exact { tokens }
            | SentenceOutcome::Partial { tokens, .. }
            | SentenceOutcome::Skipped { tokens, .. } => tokens,
        }
    }

    /// Tags que contam para o numerador da acurácia de tags.
    pub fn correct_tags(&self) -> usize {
        match *self {
            SentenceOutcome::Exact { tokens } => tokens,
            SentenceOutcome::Partial { correct, .. } => correct,
            SentenceOutcome::Skipped { .. } => 0,
        }
    }
}

/// Contadores agregados de uma avaliação.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub sentences: usize,
    pub correct_sentences: usize,
    pub skipped_sentences: usize,
    pub tokens: usize,
    pub correct_tags: usize,
}

impl EvaluationReport {
    pub fn record(&mut self, outcome: &SentenceOutcome) {
        self.sentences += 1;
        self.tokens += outcome.tokens();
        self.correct_tags += outcome.correct_tags();
        match outcome {
            SentenceOutcome::Exact { .. } => self.correct_sentences += 1,
            SentenceOutcome::Skipped { .. } => self.skipped_sentences += 1,
            SentenceOutcome::Partial { .. } => {}
        }
    }

    /// Fração de sentenças inteiramente corretas. 0 se não houver sentenças.
    pub fn sentence_accuracy(&self) -> f64 {
        ratio(self.correct_sentences, self.sentences)
    }

    /// Fração de tags corretas sobre todos os tokens. 0 se não houver tokens.
    pub fn tag_accuracy(&self) -> f64 {
        ratio(self.correct_tags, self.tokens)
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

/// Avalia sentenças anotadas com um [`Predictor`].
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'m> {
    predictor: Predictor<'m>,
}

impl<'m> Evaluator<'m> {
    pub fn new(predictor: Predictor<'m>) -> Self {
        Self { predictor }
    }

    pub fn evaluate_sentence(&self, sentence: &Sentence) -> SentenceOutcome {
        let prediction = self.predictor.predict(&sentence.words());
        SentenceOutcome::compare(&prediction, self.predictor.model().tagset(), &sentence.tags())
    }

    pub fn evaluate(&self, sentences: &[Sentence]) -> EvaluationReport {
        let mut report = EvaluationReport::default();
        for sentence in sentences {
            report.record(&self.evaluate_sentence(sentence));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::HmmModel;
    use approx::assert_relative_eq;

    fn training() -> Vec<Sentence> {
        vec![
            Sentence::from_iter([("the", "D"), ("cat", "N"), ("sleeps", "V")]),
            Sentence::from_iter([("a", "D"), ("dog", "N"), ("barks", "V")]),
        ]
    }

    #[test]
    fn test_seen_structure_scores_full_credit() {
        let model = HmmModel::train(&training());
        let evaluator = Evaluator::new(Predictor::new(&model));
        let sentence = Sentence::from_iter([("a", "D"), ("cat", "N"), ("sleeps", "V")]);

        assert_eq!(evaluator.evaluate_sentence(&sentence), SentenceOutcome::Exact { tokens: 3 });

        let report = evaluator.evaluate(&[sentence]);
        assert_relative_eq!(report.sentence_accuracy(), 1.0);
        assert_relative_eq!(report.tag_accuracy(), 1.0);
    }

    #[test]
    fn test_unknown_word_skips_but_counts_in_denominators() {
        let model = HmmModel::train(&training());
        let evaluator = Evaluator::new(Predictor::new(&model));
        let known = Sentence::from_iter([("a", "D"), ("cat", "N"), ("sleeps", "V")]);
        let unknown = Sentence::from_iter([("a", "D"), ("fish", "N"), ("sleeps", "V"), ("now", "ADV")]);

        assert_eq!(
            evaluator.evaluate_sentence(&unknown),
            SentenceOutcome::Skipped {
                tokens: 4,
                reason: Unpredictable::UnknownWord { position: 1 }
            }
        );

        let report = evaluator.evaluate(&[known, unknown]);
        assert_eq!(report.sentences, 2);
        assert_eq!(report.correct_sentences, 1);
        assert_eq!(report.skipped_sentences, 1);
        assert_eq!(report.tokens, 7);
        assert_eq!(report.correct_tags, 3);
        assert_relative_eq!(report.sentence_accuracy(), 0.5);
        assert_relative_eq!(report.tag_accuracy(), 3.0 / 7.0);
    }

    #[test]
    fn test_partial_credit() {
        // "cut" aparece como N e como V
        let model = HmmModel::train(&[
            Sentence::from_iter([("the", "D"), ("cut", "N"), ("heals", "V")]),
            Sentence::from_iter([("the", "D"), ("cut", "N"), ("bleeds", "V")]),
            Sentence::from_iter([("they", "P"), ("cut", "V")]),
            Sentence::from_iter([("the", "D"), ("cut", "V")]),
        ]);
        let evaluator = Evaluator::new(Predictor::new(&model));
        let tags = model.tagset();

        // V -> V nunca foi visto, então D N V é o único caminho
        let gold_sentence = Sentence::from_iter([("the", "D"), ("cut", "N"), ("heals", "V")]);
        assert_eq!(evaluator.evaluate_sentence(&gold_sentence), SentenceOutcome::Exact { tokens: 3 });

        // N nunca fecha sentença: "the cut" só pode sair D V
        let mislabeled = Sentence::from_iter([("the", "D"), ("cut", "N")]);
        let prediction = Predictor::new(&model).predict(&mislabeled.words());
        assert_eq!(prediction.path().unwrap().labels(tags), vec!["D", "V"]);
        assert_eq!(
            evaluator.evaluate_sentence(&mislabeled),
            SentenceOutcome::Partial { correct: 1, tokens: 2 }
        );
    }

    #[test]
    fn test_empty_report() {
        let report = EvaluationReport::default();
        assert_eq!(report.sentence_accuracy(), 0.0);
        assert_eq!(report.tag_accuracy(), 0.0);
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = SentenceOutcome::Partial { correct: 2, tokens: 3 };
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "partial", "correct": 2, "tokens": 3}));
    }
}
