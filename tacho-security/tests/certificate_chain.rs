//! Certificate chains signed by independent implementations

use num_bigint::BigUint;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use tacho_core::datatypes::TimeReal;
use tacho_security::{
    Certificate, CertificateAuthorityReference, CertificateHolderReference, Curve,
    EcPublicKey, EccCertificate, EccCertificateBody, HashAlgorithm, PublicKey, RsaCertificate,
    RsaPublicKey, RsaRootKey, SignatureStatus, TachoError,
};

fn p256_key(seed: u8) -> (SigningKey, EcPublicKey) {
    let signing_key = SigningKey::from_bytes(&[seed; 32].into()).unwrap();
    let point = signing_key.verifying_key().to_encoded_point(false);
    let public = EcPublicKey::from_uncompressed(Curve::NistP256, point.as_bytes()).unwrap();
    (signing_key, public)
}

fn ecc_certificate(
    issuer: &SigningKey,
    authority: u64,
    holder: u64,
    subject: &EcPublicKey,
) -> Vec<u8> {
    let body = EccCertificateBody {
        profile_identifier: 0,
        authority_reference: CertificateAuthorityReference::new(authority),
        holder_authorisation: [0xFF, 0x53, 0x4D, 0x52, 0x44, 0x54, 0x0E],
        public_key: subject.clone(),
        holder_reference: CertificateHolderReference::new(holder),
        effective_date: Some(TimeReal::from_civil(2024, 1, 1, 0, 0, 0).unwrap()),
        expiration_date: Some(TimeReal::from_civil(2034, 1, 1, 0, 0, 0).unwrap()),
    };
    let body_tlv = body.encode().unwrap();
    let signature: Signature = issuer.sign(&body_tlv);
    EccCertificate::assemble(&body_tlv, &signature.to_bytes())
        .unwrap()
        .raw()
        .to_vec()
}

#[test]
fn ecc_chain_root_member_card() {
    let (root_signer, root_key) = p256_key(1);
    let (member_signer, member_key) = p256_key(2);
    let (_, card_key) = p256_key(3);

    let root_bytes = ecc_certificate(&root_signer, 0x10, 0x10, &root_key);
    let member_bytes = ecc_certificate(&root_signer, 0x10, 0x20, &member_key);
    let card_bytes = ecc_certificate(&member_signer, 0x20, 0x30, &card_key);

    let mut root = EccCertificate::decode(&root_bytes).unwrap();
    root.verify_self_signed().unwrap();

    let mut member = EccCertificate::decode(&member_bytes).unwrap();
    assert_eq!(member.status(), SignatureStatus::Unverified);
    member.verify(root.public_key()).unwrap();
    assert!(member.status().is_valid());

    let mut card = EccCertificate::decode(&card_bytes).unwrap();
    assert!(card.authority_reference().refers_to(&member.holder_reference()));
    card.verify(member.public_key()).unwrap();
    assert_eq!(card.public_key(), &card_key);
}

#[test]
fn ecc_flipped_signature_bytes_fail() {
    let (root_signer, root_key) = p256_key(7);
    let bytes = ecc_certificate(&root_signer, 1, 1, &root_key);
    let signature_start = bytes.len() - 64;

    for offset in signature_start..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[offset] ^= 0x01;
        let mut certificate = Certificate::decode(&tampered, &tacho_core::Version::GEN2).unwrap();
        let result = certificate.verify(&PublicKey::Ecc(root_key.clone()));
        assert!(
            matches!(result, Err(TachoError::SignatureMismatch(_))),
            "offset {}",
            offset
        );
        assert_eq!(certificate.status().outcome(), Some(false));
    }
}

struct RsaIssuer {
    public: RsaPublicKey,
    n: BigUint,
    d: BigUint,
}

fn rsa_issuer() -> RsaIssuer {
    let private = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
    let n = private.n().to_bytes_be();
    let e = private.e().to_bytes_be();
    let mut exponent = vec![0u8; 8 - e.len()];
    exponent.extend(e);
    RsaIssuer {
        public: RsaPublicKey::new(&n, &exponent).unwrap(),
        n: BigUint::from_bytes_be(&n),
        d: BigUint::from_bytes_be(&private.d().to_bytes_be()),
    }
}

fn rsa_certificate(
    issuer: &RsaIssuer,
    authority: CertificateAuthorityReference,
    holder: CertificateHolderReference,
    subject: &RsaPublicKey,
) -> Vec<u8> {
    let mut content = vec![0x01];
    content.extend(authority.to_bytes());
    content.extend([0xFF, 0x54, 0x44, 0x52, 0x00, 0x01, 0x01]);
    content.extend(TimeReal::from_civil(2030, 6, 30, 0, 0, 0).unwrap().seconds().to_be_bytes());
    content.extend(holder.to_bytes());
    content.extend(subject.encode());

    let mut block = vec![0x6A];
    block.extend_from_slice(&content[..106]);
    block.extend(HashAlgorithm::Sha1.digest(&content));
    block.push(0xBC);

    let signature = BigUint::from_bytes_be(&block)
        .modpow(&issuer.d, &issuer.n)
        .to_bytes_be();
    let mut certificate = vec![0u8; 128 - signature.len()];
    certificate.extend(signature);
    certificate.extend_from_slice(&content[106..]);
    certificate.extend(authority.to_bytes());
    certificate
}

#[test]
fn rsa_chain_from_root_key() {
    let root = rsa_issuer();
    let member = rsa_issuer();
    let card = rsa_issuer();

    let root_reference = CertificateAuthorityReference::new(0xFD45_4320_01FF_FF01);
    let mut root_key_bytes = root_reference.to_bytes().to_vec();
    root_key_bytes.extend(root.public.encode());
    let root_key = RsaRootKey::decode(&root_key_bytes).unwrap();

    let member_holder = CertificateHolderReference::new(0x0D44_2020_01FF_FF01);
    let member_bytes = rsa_certificate(&root, root_reference, member_holder, &member.public);
    let card_bytes = rsa_certificate(
        &member,
        member_holder.as_authority(),
        CertificateHolderReference::new(0x1234_5678_0000_0001),
        &card.public,
    );

    let mut member_cert = RsaCertificate::decode(&member_bytes).unwrap();
    assert_eq!(member_cert.authority_reference(), root_key.reference);
    let member_public = member_cert.verify(&root_key.key).unwrap().public_key.clone();

    let mut card_cert = RsaCertificate::decode(&card_bytes).unwrap();
    let content = card_cert.verify(&member_public).unwrap();
    assert_eq!(content.public_key, card.public);
    assert_eq!(card_cert.status(), SignatureStatus::Valid);

    let mut wrong = RsaCertificate::decode(&card_bytes).unwrap();
    assert!(wrong.verify(&root_key.key).is_err());
    assert_eq!(wrong.status(), SignatureStatus::Invalid);
}
