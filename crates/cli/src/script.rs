//! Command-line session script.

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Deposit(f64),
    Withdraw(f64),
}

impl core::fmt::Display for Step {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Step::Deposit(a) => write!(f, "deposit {a:.2}"),
            Step::Withdraw(a) => write!(f, "withdraw {a:.2}"),
        }
    }
}

fn default_script() -> Vec<Step> {
    vec![Step::Withdraw(30.0), Step::Withdraw(20.0), Step::Withdraw(50.0)]
}

/// `+N` is a deposit, `-N` a withdrawal. The amount itself is passed to the
/// account as-is, so `+0` reaches it and is rejected there.
pub fn parse_step(raw: &str) -> Result<Step> {
    if let Some(rest) = raw.strip_prefix('+') {
        Ok(Step::Deposit(parse_amount(raw, rest)?))
    } else if let Some(rest) = raw.strip_prefix('-') {
        Ok(Step::Withdraw(parse_amount(raw, rest)?))
    } else {
        bail!("step {raw:?} must start with + (deposit) or - (withdraw)")
    }
}

fn parse_amount(raw: &str, digits: &str) -> Result<f64> {
    match digits.parse::<f64>() {
        Ok(amount) => Ok(amount),
        Err(e) => bail!("step {raw:?}: {e}"),
    }
}

pub fn parse_args(args: impl Iterator<Item = String>) -> Result<Vec<Step>> {
    let steps = args.map(|a| parse_step(&a)).collect::<Result<Vec<_>>>()?;
    if steps.is_empty() {
        Ok(default_script())
    } else {
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_steps() {
        assert_eq!(parse_step("+50").unwrap(), Step::Deposit(50.0));
        assert_eq!(parse_step("-0.5").unwrap(), Step::Withdraw(0.5));
        assert_eq!(parse_step("+0").unwrap(), Step::Deposit(0.0));
    }

    #[test]
    fn rejects_unsigned_or_garbage() {
        assert!(parse_step("50").is_err());
        assert!(parse_step("+abc").is_err());
    }

    #[test]
    fn empty_args_use_default_script() {
        let steps = parse_args(std::iter::empty()).unwrap();
        assert_eq!(steps, default_script());
    }

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Step::Withdraw(30.0).to_string(), "withdraw 30.00");
    }
}
