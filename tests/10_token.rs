mod common;

use innohub_admin::auth::{PermissionId, PermissionSet, TokenCipher, TokenDecoder, TokenError};
use innohub_admin::config::TokenConfig;

#[test]
fn round_trip_reproduces_user_and_permissions() {
    let decoder = common::decoder();
    let sealed = common::sealed_token(31, &[2001, 4205]);

    let claims = decoder.decode(&sealed).unwrap();

    assert_eq!(claims.user_id, Some(31));
    assert_eq!(claims.permissions, PermissionSet::from([2001, 4205]));
    assert_eq!(claims.claim_str("unique_name"), Some("user31"));
}

#[test]
fn decoding_twice_gives_identical_claims() {
    let decoder = common::decoder();
    let sealed = common::sealed_token(4, &[4201, 4202]);

    let first = decoder.decode(&sealed).unwrap();
    let second = decoder.decode(&sealed).unwrap();

    assert_eq!(first, second);
}

#[test]
fn decoder_built_from_default_config_opens_backend_tokens() {
    let decoder = TokenDecoder::from_config(&TokenConfig::default()).unwrap();
    let claims = decoder.decode(&common::sealed_token(1, &[4201])).unwrap();
    assert!(claims.has_permission(PermissionId::ADD_NEW_ROLE_BUTTON));
}

#[test]
fn corrupted_ciphertext_raises_at_the_decoder() {
    let decoder = common::decoder();

    assert!(matches!(decoder.decode("@@not-base64@@"), Err(TokenError::InvalidBase64(_))));
    assert!(matches!(decoder.decode("AAAAAAAA"), Err(TokenError::Padding)));

    let mut sealed = common::sealed_token(1, &[4201]);
    sealed.truncate(sealed.len() - 8);
    assert!(decoder.decode(&sealed).is_err());
}

#[test]
fn token_sealed_with_another_key_is_rejected() {
    let foreign = TokenCipher::with_zero_iv("ffffffffffffffffffffffffffffffff").unwrap();
    let sealed = foreign.seal(&common::signed_jwt(1, &[4201])).unwrap();

    assert!(common::decoder().decode(&sealed).is_err());
}

#[test]
fn sealed_plain_text_is_not_a_jwt() {
    let decoder = common::decoder();
    let sealed = decoder.cipher().seal("{\"userId\":1}").unwrap();
    assert!(matches!(decoder.decode(&sealed), Err(TokenError::Jwt(_))));
}

#[test]
fn default_config_opens_externally_sealed_ciphertext() {
    // produced outside this crate with AES-256-CBC, zero IV, PKCS#7
    let sealed = "Oj6xc5xX89jEkb+T4GeE7Vb3L3SBBn/RY4E+DzMV3og=";

    let cipher = TokenCipher::from_config(&TokenConfig::default()).unwrap();

    assert_eq!(cipher.open(sealed).unwrap(), "header.payload.signature");
    assert!(matches!(
        TokenDecoder::new(cipher).decode(sealed),
        Err(TokenError::Jwt(_))
    ));
}
