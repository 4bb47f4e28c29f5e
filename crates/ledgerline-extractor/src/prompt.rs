//! Prompts for the text-to-structured-data engine

/// Fixed system prompt: the output contract every chunk is parsed against
pub const SYSTEM_PROMPT: &str = r#"You convert bank statement text into transaction records.
The text may come from any Nigerian bank layout (Zenith, GTBank, Access, First Bank, UBA,
Stanbic IBTC, Fidelity, Polaris, Sterling, Wema, Union Bank, FCMB, Ecobank, Jaiz and others).
Rows may be pipe-delimited as: date | description | debit | credit | balance

Return every transaction row as ONE JSON array and nothing else.
Each element is an object with exactly these keys:
  "date"        - transaction date as printed, e.g. "01/12/2025"
  "value_date"  - value date as printed; use "date" when the statement has none
  "description" - the narration, shortened to under 100 characters
  "debit"       - money out as a plain number string, e.g. "7037.31", or "0"
  "credit"      - money in as a plain number string, e.g. "330000.00", or "0"
  "balance"     - running balance as a plain number string, e.g. "26397.74", or "0"

Amounts:
- previous_balance - debit + credit = balance. Use it to check every row.
- A row where the balance goes down is a debit; where it goes up, a credit.
- The balance is the rightmost amount on a row. Debit sits left of credit.
- Copy every digit: "7,037.31" becomes "7037.31", never "737.31".
- No currency symbols and no thousands separators inside amounts.

Output:
- A JSON array only. No markdown fences, no commentary.
- Return [] when the text holds no transactions."#;

/// Builds the per-chunk user prompt
pub struct PromptBuilder<'a> {
    chunk: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt for one chunk of statement text
    pub fn new(chunk: &'a str) -> Self {
        Self { chunk }
    }

    /// Build the complete user prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(USER_INSTRUCTIONS.len() + self.chunk.len() + 2);
        prompt.push_str(USER_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(self.chunk);
        prompt
    }
}

const USER_INSTRUCTIONS: &str = "Extract ALL transactions from this bank statement text.
Check each debit and credit against the BALANCE column: balance down = debit, balance up = credit.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_ends_with_chunk() {
        let prompt = PromptBuilder::new("01/12/2025 | POS | 7037.31 |  | 26397.74").build();
        assert!(prompt.starts_with("Extract ALL transactions"));
        assert!(prompt.ends_with("01/12/2025 | POS | 7037.31 |  | 26397.74"));
        assert!(prompt.contains("balance down = debit"));
    }

    #[test]
    fn test_system_prompt_names_every_field() {
        for field in ["\"date\"", "\"value_date\"", "\"description\"", "\"debit\"", "\"credit\"", "\"balance\""] {
            assert!(SYSTEM_PROMPT.contains(field), "missing {}", field);
        }
        assert!(SYSTEM_PROMPT.contains("Return [] when"));
    }
}
