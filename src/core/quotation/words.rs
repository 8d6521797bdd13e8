//! Spanish amount-in-words for the legal total line (Mexican pesos).

/// Rendered instead of words when the amount cannot be expressed.
pub const AMOUNT_PLACEHOLDER: &str = "(importe no disponible)";

/// Largest amount rendered in words.
const MAX_AMOUNT: f64 = 999_999_999.99;

const UNITS: [&str; 30] = [
    "cero",
    "uno",
    "dos",
    "tres",
    "cuatro",
    "cinco",
    "seis",
    "siete",
    "ocho",
    "nueve",
    "diez",
    "once",
    "doce",
    "trece",
    "catorce",
    "quince",
    "dieciséis",
    "diecisiete",
    "dieciocho",
    "diecinueve",
    "veinte",
    "veintiuno",
    "veintidós",
    "veintitrés",
    "veinticuatro",
    "veinticinco",
    "veintiséis",
    "veintisiete",
    "veintiocho",
    "veintinueve",
];

const TENS: [&str; 10] = [
    "", "", "", "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "ciento",
    "doscientos",
    "trescientos",
    "cuatrocientos",
    "quinientos",
    "seiscientos",
    "setecientos",
    "ochocientos",
    "novecientos",
];

/// Units below 30, shortened before a noun ("un", "veintiún") when `apocope` is set.
fn unit_word(n: u64, apocope: bool) -> &'static str {
    match (n, apocope) {
        (1, true) => "un",
        (21, true) => "veintiún",
        _ => UNITS[n as usize],
    }
}

fn below_thousand(n: u64, apocope: bool) -> String {
    if n == 100 {
        return "cien".to_string();
    }
    let mut parts: Vec<&str> = Vec::with_capacity(4);
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        parts.push(HUNDREDS[hundreds as usize]);
    }
    if rest > 0 {
        if rest < 30 {
            parts.push(unit_word(rest, apocope));
        } else {
            parts.push(TENS[(rest / 10) as usize]);
            if rest % 10 > 0 {
                parts.push("y");
                parts.push(unit_word(rest % 10, apocope));
            }
        }
    }
    parts.join(" ")
}

/// Whole number in Spanish words. `apocope` shortens a trailing "uno" for use before
/// a noun ("veintiún pesos"). Supports values below one billion.
pub fn integer_to_words(n: u64, apocope: bool) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }
    let millions = n / 1_000_000;
    let thousands = (n / 1_000) % 1_000;
    let rest = n % 1_000;

    let mut parts = Vec::with_capacity(3);
    match millions {
        0 => {}
        1 => parts.push("un millón".to_string()),
        m => parts.push(format!("{} millones", below_thousand(m, true))),
    }
    match thousands {
        0 => {}
        1 => parts.push("mil".to_string()),
        t => parts.push(format!("{} mil", below_thousand(t, true))),
    }
    if rest > 0 {
        parts.push(below_thousand(rest, apocope));
    }
    parts.join(" ")
}

/// Amount in words for the quotation total, e.g.
/// `"doce mil trescientos cuarenta y cinco pesos 67/100 M.N."`.
///
/// Negative, non-finite or out-of-range amounts yield [`AMOUNT_PLACEHOLDER`].
pub fn amount_in_words(amount: f64) -> String {
    if !amount.is_finite() || amount < 0.0 || amount > MAX_AMOUNT {
        return AMOUNT_PLACEHOLDER.to_string();
    }
    let total_cents = (amount * 100.0).round() as u64;
    let pesos = total_cents / 100;
    let cents = total_cents % 100;

    let words = integer_to_words(pesos, true);
    let noun = if pesos == 1 {
        "peso"
    } else if pesos >= 1_000_000 && pesos % 1_000_000 == 0 {
        "de pesos"
    } else {
        "pesos"
    };
    format!("{} {} {:02}/100 M.N.", words, noun, cents)
}
