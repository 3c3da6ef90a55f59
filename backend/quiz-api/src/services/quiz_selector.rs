use rand::Rng;

use crate::models::Question;

/// Draws a uniform, duplicate-free sample of `min(count, len)` questions.
///
/// Partial Fisher–Yates over an index vector: only the first `take`
/// positions need shuffling, and every element has an equal chance of
/// landing in the sample regardless of its original position. The stored
/// set is not mutated.
pub fn select_quiz(questions: &[Question], count: usize) -> Vec<Question> {
    let take = count.min(questions.len());
    let mut indices: Vec<usize> = (0..questions.len()).collect();
    let mut rng = rand::rng();

    for i in 0..take {
        let j = rng.random_range(i..indices.len());
        indices.swap(i, j);
    }

    indices[..take]
        .iter()
        .map(|&i| questions[i].clone())
        .collect()
}
