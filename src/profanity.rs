/// Chirp profanity filter
///
/// Literal substring replacement of a fixed word list, matched in the
/// capitalized and the all-lowercase spelling only.

const PROFANE_WORDS: [&str; 3] = ["Kerfuffle", "Sharbert", "Fornax"];
const MASK: &str = "****";

pub fn replace_profane(sentence: &str) -> String {
    PROFANE_WORDS.iter().fold(sentence.to_string(), |text, word| {
        text.replace(word, MASK).replace(&word.to_lowercase(), MASK)
    })
}
