use soroban_sdk::{log, Address, Env, String};
use stellar_strkey::Strkey;

use crate::error::{ErrorCode, HarborResult};

const STRKEY_LEN: usize = 56;

/// Longest string accepted where a short identifier is expected
pub const MAX_IDENTIFIER_LEN: u32 = 64;

/// Parses a strkey string into an `Address`, failing instead of trapping on
/// malformed input.
pub fn parse_address(env: &Env, strkey: &String) -> HarborResult<Address> {
    if strkey.len() as usize != STRKEY_LEN {
        log!(env, "Invalid address length {}", strkey.len());
        return Err(ErrorCode::InvalidAddress);
    }
    let mut encoded = [0u8; STRKEY_LEN];
    strkey.copy_into_slice(&mut encoded);
    let decoded = core::str::from_utf8(&encoded)
        .ok()
        .and_then(|encoded| Strkey::from_string(encoded).ok());
    if !matches!(decoded, Some(Strkey::PublicKeyEd25519(_)) | Some(Strkey::Contract(_))) {
        log!(env, "Invalid address encoding");
        return Err(ErrorCode::InvalidAddress);
    }
    Ok(Address::from_string(strkey))
}

/// True when `value` is empty or made only of ASCII whitespace. Strings
/// longer than `MAX_IDENTIFIER_LEN` are never blank.
pub fn is_blank(value: &String) -> bool {
    let len = value.len();
    if len == 0 {
        return true;
    }
    if len > MAX_IDENTIFIER_LEN {
        return false;
    }
    let mut buf = [0u8; MAX_IDENTIFIER_LEN as usize];
    let slice = &mut buf[..len as usize];
    value.copy_into_slice(slice);
    slice.iter().all(|c| c.is_ascii_whitespace())
}

#[cfg(test)]
mod test {
    use super::*;

    const ACCOUNT: &str = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
    const CONTRACT: &str = "CCZ4RN7UHYPZC7D2KUIA5VAMNEMJLGSHVDXLY3MAM57O2DM5B3FRC63U";

    #[test]
    fn parses_account_and_contract_keys() {
        let env = Env::default();
        for key in [ACCOUNT, CONTRACT] {
            let strkey = String::from_str(&env, key);
            assert_eq!(parse_address(&env, &strkey), Ok(Address::from_string(&strkey)));
        }
    }

    #[test]
    fn rejects_corrupted_keys() {
        let env = Env::default();
        // last character flipped breaks the checksum
        let corrupted = "CCZ4RN7UHYPZC7D2KUIA5VAMNEMJLGSHVDXLY3MAM57O2DM5B3FRC63V";
        let lowercase = "ccz4rn7uhypzc7d2kuia5vamnemjlgshvdxly3mam57o2dm5b3frc63u";
        // valid pre-auth tx strkey, not an address
        let pre_auth = "TAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB6ULG";
        for key in [corrupted, lowercase, pre_auth] {
            assert_eq!(
                parse_address(&env, &String::from_str(&env, key)),
                Err(ErrorCode::InvalidAddress)
            );
        }
    }

    #[test]
    fn parse_address_round_trip() {
        let env = Env::default();
        let strkey = String::from_str(&env, CONTRACT);
        let address = parse_address(&env, &strkey).unwrap();
        assert_eq!(address, Address::from_string(&strkey));

        let short = String::from_str(&env, "CCZ4");
        assert_eq!(parse_address(&env, &short), Err(ErrorCode::InvalidAddress));
    }

    #[test]
    fn blank_strings() {
        let env = Env::default();
        assert!(is_blank(&String::from_str(&env, "")));
        assert!(is_blank(&String::from_str(&env, "  \t ")));
        assert!(!is_blank(&String::from_str(&env, " BTC-A ")));
    }
}
