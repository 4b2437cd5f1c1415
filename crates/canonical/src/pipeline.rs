use std::borrow::Cow;

use fxhash::FxHashSet;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::NormalizerConfig;
use crate::error::CanonicalError;
use crate::stop_tokens::DEFAULT_STOP_TOKENS;
use crate::token::Token;
use crate::transliterate::transliterate_char;

/// Normalizes address text with a fixed, validated configuration.
///
/// Construction resolves the stop-token set once; [`normalize`](Self::normalize)
/// is then infallible and cheap to call per record. The value is immutable and
/// `Send + Sync`, so one instance serves every worker of a batch.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    config: NormalizerConfig,
    stop_tokens: FxHashSet<String>,
}

impl TextNormalizer {
    pub fn new(config: NormalizerConfig) -> Result<Self, CanonicalError> {
        config.validate()?;

        let mut normalizer = Self {
            config,
            stop_tokens: FxHashSet::default(),
        };
        let mut stop_tokens = FxHashSet::default();
        if normalizer.config.default_stop_tokens {
            for token in DEFAULT_STOP_TOKENS {
                for t in normalizer.raw_tokens(token) {
                    stop_tokens.insert(t.text);
                }
            }
        }
        for token in &normalizer.config.extra_stop_tokens {
            for t in normalizer.raw_tokens(token) {
                stop_tokens.insert(t.text);
            }
        }
        normalizer.stop_tokens = stop_tokens;
        Ok(normalizer)
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn is_stop_token(&self, token: &str) -> bool {
        self.stop_tokens.contains(token)
    }

    /// Canonical form of `input`: tokens joined by single spaces.
    ///
    /// Idempotent: `normalize(normalize(x)) == normalize(x)`. Returns an empty
    /// string when nothing but punctuation and noise tokens remain.
    pub fn normalize(&self, input: &str) -> String {
        let tokens = self.tokens(input);
        let mut out = String::with_capacity(input.len());
        for token in &tokens {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&token.text);
        }
        out
    }

    /// Tokens of the canonical form, with stop tokens removed. Offsets refer
    /// to the text returned by [`normalize`](Self::normalize).
    pub fn tokens(&self, input: &str) -> Vec<Token> {
        let mut offset = 0usize;
        self.raw_tokens(input)
            .into_iter()
            .filter(|t| !self.stop_tokens.contains(&t.text))
            .map(|t| {
                let start = if offset == 0 { 0 } else { offset + 1 };
                let end = start + t.text.len();
                offset = end;
                Token {
                    text: t.text,
                    start,
                    end,
                }
            })
            .collect()
    }

    /// Runs every transform except stop-token removal.
    fn raw_tokens(&self, input: &str) -> Vec<Token> {
        // Unicode normalization comes first, as it can change character boundaries.
        let normalized: Cow<str> = if self.config.normalize_unicode {
            Cow::Owned(input.nfkc().collect::<String>())
        } else {
            Cow::Borrowed(input)
        };

        let mut state = TokenState::with_capacity(normalized.len());
        for grapheme in normalized.graphemes(true) {
            // Lowercasing can expand a single character (e.g. 'İ' -> "i̇").
            if self.config.lowercase {
                for lower in grapheme.to_lowercase().chars() {
                    self.dispatch_char(lower, &mut state);
                }
            } else {
                for ch in grapheme.chars() {
                    self.dispatch_char(ch, &mut state);
                }
            }
        }
        state.finalize_token();
        state.tokens
    }

    /// Letters and digits extend the current token; anything else ends it.
    ///
    /// Punctuation splits rather than vanishes, so abbreviations glued to the
    /// next word (`д.10`, `ул.Ленина`) still surface as stop tokens.
    fn dispatch_char(&self, ch: char, state: &mut TokenState) {
        if !ch.is_alphanumeric() {
            state.finalize_token();
            return;
        }
        if self.config.transliterate_cyrillic {
            if let Some(latin) = transliterate_char(ch) {
                latin.chars().for_each(|c| state.append_char(c));
                return;
            }
        }
        state.append_char(ch);
    }
}

/// Tokenizer state: canonical text built so far plus the open token.
struct TokenState {
    text: String,
    tokens: Vec<Token>,
    current_token_start: Option<usize>,
}

impl TokenState {
    fn with_capacity(len: usize) -> Self {
        Self {
            text: String::with_capacity(len),
            tokens: Vec::with_capacity((len / 4).saturating_add(1)),
            current_token_start: None,
        }
    }

    fn append_char(&mut self, ch: char) {
        if self.current_token_start.is_none() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.current_token_start = Some(self.text.len());
        }
        self.text.push(ch);
    }

    fn finalize_token(&mut self) {
        if let Some(start) = self.current_token_start.take() {
            if start < self.text.len() {
                let end = self.text.len();
                self.tokens.push(Token {
                    text: self.text[start..end].to_string(),
                    start,
                    end,
                });
            }
        }
    }
}

/// One-shot normalization with `cfg`.
///
/// Builds a [`TextNormalizer`] per call; hold on to a `TextNormalizer` when
/// normalizing many strings with the same configuration.
pub fn normalize(input: &str, cfg: &NormalizerConfig) -> Result<String, CanonicalError> {
    Ok(TextNormalizer::new(cfg.clone())?.normalize(input))
}
