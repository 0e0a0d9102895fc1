use validator::ValidationError;

/// National id in the form `12345678-5`, verified against its mod-11 check
/// digit (`k` stands for 10).
pub fn validate_national_id(value: &str) -> Result<(), ValidationError> {
    let Some((digits, check)) = value.rsplit_once('-') else {
        return Err(ValidationError::new("national_id_format"));
    };
    if digits.len() < 7 || digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new("national_id_format"));
    }
    let expected = match check {
        "k" | "K" => 10u32,
        c if c.len() == 1 && c.bytes().all(|b| b.is_ascii_digit()) => {
            c.parse().map_err(|_| ValidationError::new("national_id_format"))?
        }
        _ => return Err(ValidationError::new("national_id_format")),
    };

    let mut factor = 2u32;
    let mut sum = 0u32;
    for b in digits.bytes().rev() {
        sum += (b - b'0') as u32 * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    let computed = match 11 - (sum % 11) {
        11 => 0,
        v => v,
    };
    if computed != expected {
        return Err(ValidationError::new("national_id_check_digit"));
    }
    Ok(())
}

/// Money amounts travel as digit strings, optionally dot-grouped in
/// thousands (`1500000` or `1.500.000`). Floats, signs and empty strings
/// are rejected.
pub fn validate_amount(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("amount_format"));
    }
    let groups: Vec<&str> = value.split('.').collect();
    if groups.len() == 1 {
        if groups[0].bytes().all(|b| b.is_ascii_digit()) {
            return Ok(());
        }
        return Err(ValidationError::new("amount_format"));
    }
    let ok = !groups[0].is_empty()
        && groups[0].len() <= 3
        && groups[0].bytes().all(|b| b.is_ascii_digit())
        && groups[1..]
            .iter()
            .all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("amount_format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_national_ids() {
        // 12345678 -> check digit 5
        assert!(validate_national_id("12345678-5").is_ok());
        // 1000005 -> check digit k
        assert!(validate_national_id("1000005-k").is_ok());
        assert!(validate_national_id("1000005-K").is_ok());
    }

    #[test]
    fn rejects_mutated_check_digit() {
        assert!(validate_national_id("12345678-4").is_err());
        assert!(validate_national_id("12345678-k").is_err());
    }

    #[test]
    fn rejects_malformed_national_ids() {
        assert!(validate_national_id("12345678").is_err());
        assert!(validate_national_id("1234a678-5").is_err());
        assert!(validate_national_id("123-5").is_err());
        assert!(validate_national_id("12345678-55").is_err());
    }

    #[test]
    fn accepts_plain_and_grouped_amounts() {
        assert!(validate_amount("0").is_ok());
        assert!(validate_amount("1500000").is_ok());
        assert!(validate_amount("1.500.000").is_ok());
        assert!(validate_amount("500.000").is_ok());
    }

    #[test]
    fn rejects_non_integer_amounts() {
        assert!(validate_amount("").is_err());
        assert!(validate_amount("-100").is_err());
        assert!(validate_amount("100.5").is_err());
        assert!(validate_amount("1,500").is_err());
        assert!(validate_amount(".500").is_err());
        assert!(validate_amount("1500.0000").is_err());
    }
}
