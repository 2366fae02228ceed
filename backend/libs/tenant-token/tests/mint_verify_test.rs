//! Minting at the origin and verifying with independently held keys

use chrono::Utc;
use std::sync::Arc;
use tenant_secrets::{SecretKeyProvider, StaticKeyStore};
use tenant_token::{
    session_cookie, verify_token, CookieScopePolicy, TokenError, TokenMinter,
};

fn provider(key_b64: &str) -> Arc<SecretKeyProvider> {
    let store = StaticKeyStore::from_base64_key("tenantctx_hmac_key", key_b64);
    Arc::new(SecretKeyProvider::builder(Arc::new(store)).build())
}

#[tokio::test]
async fn test_mint_then_verify_with_same_key_and_other_key() {
    // K and K' are two unrelated keys
    let origin_keys = provider("S2V5LUs=");
    let edge_keys = provider("S2V5LUs=");
    let rotated_keys = provider("S2V5LUsn");

    let minter = TokenMinter::new(origin_keys);
    let minted = minter.mint("tenant-customer1", 60).await.unwrap();
    let now = Utc::now().timestamp();

    let key = edge_keys.get_key().await.unwrap();
    let payload = verify_token(&minted.token, &key, now).unwrap();
    assert_eq!(payload.tenant_id, "tenant-customer1");

    let other = rotated_keys.get_key().await.unwrap();
    assert!(matches!(
        verify_token(&minted.token, &other, now),
        Err(TokenError::SignatureMismatch)
    ));
}

#[tokio::test]
async fn test_token_expires_after_ttl() {
    let keys = provider("S2V5LUs=");
    let minter = TokenMinter::new(keys.clone());
    let minted = minter.mint("tenant-customer2", 1).await.unwrap();
    let key = keys.get_key().await.unwrap();

    assert!(verify_token(&minted.token, &key, minted.expires_at).is_ok());
    assert!(matches!(
        verify_token(&minted.token, &key, minted.expires_at + 1),
        Err(TokenError::Expired { .. })
    ));
}

#[tokio::test]
async fn test_cookie_expiry_matches_token() {
    let minter = TokenMinter::new(provider("S2V5LUs="));
    let minted = minter.mint("tenant-customer3", 60).await.unwrap();

    let policy = CookieScopePolicy::for_host("d1.cloudfront.net", ".cloudfront.net");
    let cookie = session_cookie(&minted.token, minted.expires_at, &policy).unwrap();

    assert_eq!(cookie.value(), minted.token);
    assert_eq!(
        cookie.expires_datetime().map(|t| t.unix_timestamp()),
        Some(minted.expires_at)
    );
}
