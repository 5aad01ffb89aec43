use dashkit_transactions::Output;

/// Whether a wallet output uses a script type whose spend the current
/// bloom filter would miss.
pub fn has_irregular_output(outputs: &[Output]) -> bool {
    outputs
        .iter()
        .any(|o| o.is_mine() && o.script_type.is_irregular())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p2pk_output(mine: bool) -> Output {
        let mut script = vec![33];
        script.extend_from_slice(&[2; 33]);
        script.push(0xac);
        let mut output = Output::new(1, 0, script);
        if mine {
            output.public_key_path = Some("m/0".into());
        }
        output
    }

    #[test]
    fn only_wallet_p2pk_is_irregular() {
        assert!(has_irregular_output(&[p2pk_output(true)]));
        assert!(!has_irregular_output(&[p2pk_output(false)]));
        assert!(!has_irregular_output(&[]));
    }
}
