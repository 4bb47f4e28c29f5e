//! Issuing bank detection

/// Markers searched for in the lower-cased document text, in priority order
const BANK_MARKERS: [(&str, &str); 20] = [
    ("zenith", "Zenith Bank"),
    ("ecobank", "Ecobank"),
    ("opay", "OPay"),
    ("guaranty", "GTBank"),
    ("gtbank", "GTBank"),
    ("access bank", "Access Bank"),
    ("united bank", "UBA"),
    ("uba", "UBA"),
    ("first bank", "First Bank"),
    ("fidelity", "Fidelity Bank"),
    ("stanbic", "Stanbic IBTC"),
    ("kuda", "Kuda Bank"),
    ("moniepoint", "Moniepoint"),
    ("palmpay", "PalmPay"),
    ("wema", "Wema Bank"),
    ("fcmb", "FCMB"),
    ("sterling", "Sterling Bank"),
    ("union bank", "Union Bank"),
    ("polaris", "Polaris Bank"),
    ("jaiz", "Jaiz Bank"),
];

/// Name reported when no marker matches
pub const UNKNOWN_BANK: &str = "Unknown";

/// Detect the issuing bank from document text.
///
/// Case-insensitive substring search; the first marker in table order wins.
pub fn detect_bank(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    BANK_MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
        .map_or(UNKNOWN_BANK, |(_, name)| name)
}
