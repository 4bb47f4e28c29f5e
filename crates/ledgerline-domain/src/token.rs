//! Positioned text tokens and the rows built from them

/// A single recognized word and its bounding box on a page.
///
/// Coordinates follow the PDF text-extraction convention: `x` grows to the
/// right and `y` grows downward from the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token text
    pub text: String,
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl Token {
    /// Create a token from its text and bounding box
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgerline_domain::Token;
    ///
    /// let token = Token::new("Balance", 400.0, 100.0, 460.0, 110.0);
    /// assert_eq!(token.center_x(), 430.0);
    /// ```
    pub fn new(text: impl Into<String>, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            y0,
            x1,
            y1,
        }
    }

    /// Horizontal midpoint of the bounding box
    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Tokens sharing an approximate vertical position, ordered left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    tokens: Vec<Token>,
}

impl Row {
    /// Build a row, ordering the tokens by their left edge
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        Self { tokens }
    }

    /// Tokens in left-to-right order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens in the row
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the row holds no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token texts joined with single spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
