//! Shared test helpers for product key tests.

#![allow(dead_code)]

use bmckey_license::binary::{identifier, ProductKey};
use bmckey_license::json::License;
use bmckey_net::{MacAddress, Oui};
use bmckey_search::SearchOptions;
use chrono::{TimeZone, Utc};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// OOB key issued for [`OOB_MAC`].
pub const OOB_KEY: &str = "CE27-F641-9B04-6B24-5D04-5D32";
pub const OOB_MAC: &str = "3c:ec:ef:12:34:56";

/// JSON license signed by the vendor for [`JSON_MAC`].
pub const JSON_LICENSE: &str = r#"{"ProductKey":{"Node":{"LicenseID":"1","LicenseName":"SFT-OOB-LIC","CreateDate":"20200921"},"Signature":"OAaLKLy5IEK9WnIdnyA9ew89qTKQrm1eu+Q84CbwjR7XG7JGYccec+3vS3y/kQRRej3DcNVQPWsasX86ROTT+LZFsNY2mIEbQ6+Y/Tmv6+jwYgbQjEN6CjI7ahyKcebN12+3cLvPZyRf3kDqgtcpfuw3Qeg8BbhhyHQk29yNp+NG0XbKn02sHTrskvAGgG0GGlDCT5YmNa0gDSMzsvt/eH9nskb5opQNE3j7MAMXbjpI7xVHRbmB2N5iSu8gQUj0/pmk615ztM/uB54ur3GninJRU74S9Kotz+JunJg4pprGyQW544ggmzklmtr3zCA3GK/d929eZsVk5p8UxXG7wQ=="}}"#;
pub const JSON_MAC: &str = "AC1F6B3DDAEC";

/// Well-formed license whose signature is all zero bytes.
pub const INVALID_JSON_LICENSE: &str = r#"{"ProductKey":{"Node":{"LicenseID":"0","LicenseName":"INVALID-LIC","CreateDate":"00000000"},"Signature":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=="}}"#;

/// [`all_key`] encoded for [`BINARY_MAC`].
pub const BINARY_KEY: &str = "AAYAAAAAAAAAAAAAAAAAAExLCU/N0RxxvG7ZACnE9iyfm1zRK6acy5rtKA01mFtnuCkFSJQtmsmoAN7KVyfxVbUpwPvJNKc2tkQbezXSbITnPSKnp8i9uG+C8DB+9oISsuTL8L0v07TOOsAnrSq4fR4mAhwANTYsmoLYmpqhVDLH/VVisfqVFSZu72vTDf2rjYESalQNawzIH8qjEhS2dzDUTm4RWf122JiPTSccbg2V8b4XXLRSefvc4ctVmCVvmrWRX+Aosgn9z0VS5V1ABhitiDjBd4NK34wOoGtn0vTwdiAfjMH95U5Q+c4hCjWsUnTrlUrdH5OQgtCDGi7Nag==";
pub const BINARY_MAC: &str = "3cecef123456";
pub const BINARY_SECRET: &[u8] = b"76aa41c893a4e32a34203d8d47b0faab";
pub const BINARY_CHECKSUM: u8 = 0xab;

/// SDDC key version `1.2`, invoice `INV-42`, created 2024-03-01, expiring
/// 2025-03-01, property `01EE`, for [`SDDC_MAC`].
pub const SDDC_KEY: &str = "ANIAAAAAAAAAAAAAAAAAAB4jf8HDKuZyo9qWrtgMV8e+2lzeSs8t6OEDHpXSwSQyWHkrrUN8lexRYXNJDsH7zh/nU5bspd/FGwrg2uZHuuQl3Xl5+sCGOq4pe9gH6AcJqzQvZGlvf42vQc6IxVQL3bOQ5Ye/D7Aqcg2VXZNBH5L+6BM7GEMHwX1W3SPaXoEzDLwKa9mZuFZfPEkWrmkxnpRK7+wkI3j/XIcZ2/McEi1fbzemqqMCbWXPzS3nhiY3s2u6pAUUFUgphx6wQLB1I5zJ/fMAz3XwDIOrKZYG0ePizB0Xx55l0C7Q5BpYaHazPAEH/EIGixkquznHYTqSSQ==";
pub const SDDC_MAC: &str = "ac:1f:6b:3d:da:ec";
pub const SDDC_SECRET: &[u8] = b"084e338f373d339fd0b3dd049ed6c43a";
pub const SDDC_CHECKSUM: u8 = 7;

/// `ALL` key with version and invoice `none`, created 2000-01-01 and never
/// expiring.
pub fn all_key() -> ProductKey {
    let mut key = ProductKey::new();
    key.software_identifier = identifier::ALL;
    key.creation_date = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    key
}

pub fn mac(s: &str) -> MacAddress {
    MacAddress::parse(s).unwrap()
}

/// Search options scanning a single vendor block.
pub fn single_block(oui: &str) -> SearchOptions {
    SearchOptions::default()
        .with_workers(2)
        .with_blocks(vec![Oui::parse(oui).unwrap()])
}

/// A throwaway 1024-bit key pair, generated once per test binary.
pub fn test_keypair() -> &'static (RsaPrivateKey, RsaPublicKey) {
    static KEYPAIR: OnceLock<(RsaPrivateKey, RsaPublicKey)> = OnceLock::new();
    KEYPAIR.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let public = RsaPublicKey::from(&private);
        (private, public)
    })
}

/// Signs a license the way the vendor does, with `key`.
pub fn sign_license(
    key: &RsaPrivateKey,
    mac: &MacAddress,
    license_id: &str,
    license_name: &str,
    create_date: &str,
) -> License {
    let unsigned = License::new(license_id, license_name, create_date, Vec::new()).unwrap();
    let hashed = Sha256::digest(unsigned.signed_message(mac));
    let signature = key.sign(Pkcs1v15Sign::new::<Sha256>(), &hashed).unwrap();
    License::new(license_id, license_name, create_date, signature).unwrap()
}
