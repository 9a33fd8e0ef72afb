use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribute labels in the order the model emits its logits.
pub const CLASS_NAMES: [&str; 18] = [
    "smile",
    "gender_male",
    "gender_female",
    "hair_brown",
    "hair_black",
    "hair_blond",
    "hair_gray",
    "hair_long",
    "hair_short",
    "ethnicity_asian",
    "ethnicity_black",
    "ethnicity_latino",
    "ethnicity_white",
    "eye_blue",
    "eye_brown",
    "eye_green",
    "has_facial_hair",
    "eyeglasses",
];

pub const GENDER_MALE: usize = 1;
pub const GENDER_FEMALE: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_name: String,
    pub percentage: f64,
}

#[derive(Error, Debug, PartialEq)]
pub enum PostprocessError {
    #[error("expected output of shape [batch, labels], got {0:?}")]
    UnexpectedShape(Vec<usize>),

    #[error("expected at least {expected} logits, got {got}")]
    TooFewLogits { expected: usize, got: usize },

    #[error("logit {index} is not finite ({value})")]
    NonFinite { index: usize, value: f32 },
}

/// Logistic function
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pick the gender label from the first batch element of a `[batch, labels]`
/// output tensor.
pub fn gender_from_output(logits: &ArrayD<f32>) -> Result<Prediction, PostprocessError> {
    if logits.ndim() != 2 || logits.shape()[0] == 0 {
        return Err(PostprocessError::UnexpectedShape(logits.shape().to_vec()));
    }

    let first: Vec<f32> = logits.index_axis(Axis(0), 0).iter().copied().collect();
    gender_from_logits(&first)
}

/// Sigmoid the male and female logits independently and keep the larger.
///
/// The two percentages are not normalized against each other and need not sum
/// to 100. Male wins only on a strict `>`, so ties go to female.
pub fn gender_from_logits(logits: &[f32]) -> Result<Prediction, PostprocessError> {
    let needed = GENDER_FEMALE + 1;
    if logits.len() < needed {
        return Err(PostprocessError::TooFewLogits {
            expected: needed,
            got: logits.len(),
        });
    }

    for index in [GENDER_MALE, GENDER_FEMALE] {
        if !logits[index].is_finite() {
            return Err(PostprocessError::NonFinite {
                index,
                value: logits[index],
            });
        }
    }

    let male = sigmoid(logits[GENDER_MALE] as f64) * 100.0;
    let female = sigmoid(logits[GENDER_FEMALE] as f64) * 100.0;

    let (index, percentage) = if male > female {
        (GENDER_MALE, male)
    } else {
        (GENDER_FEMALE, female)
    };

    Ok(Prediction {
        class_name: CLASS_NAMES[index].to_string(),
        percentage: round2(percentage),
    })
}
