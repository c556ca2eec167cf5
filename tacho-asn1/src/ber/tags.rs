//! Tags of card-verifiable certificate elements

use crate::ber::types::BerTag;

/// `7F21` CV certificate
pub const CV_CERTIFICATE: BerTag = BerTag::application(true, 33);
/// `7F4E` certificate body
pub const CERTIFICATE_BODY: BerTag = BerTag::application(true, 78);
/// `5F29` certificate profile identifier
pub const PROFILE_IDENTIFIER: BerTag = BerTag::application(false, 41);
/// `42` certificate authority reference
pub const AUTHORITY_REFERENCE: BerTag = BerTag::application(false, 2);
/// `5F4C` certificate holder authorisation
pub const HOLDER_AUTHORISATION: BerTag = BerTag::application(false, 76);
/// `7F49` public key
pub const PUBLIC_KEY: BerTag = BerTag::application(true, 73);
/// `06` domain parameters (curve OID)
pub const DOMAIN_PARAMETERS: BerTag = BerTag::universal(false, 6);
/// `86` public point
pub const PUBLIC_POINT: BerTag = BerTag::context_specific(false, 6);
/// `5F20` certificate holder reference
pub const HOLDER_REFERENCE: BerTag = BerTag::application(false, 32);
/// `5F25` effective date
pub const EFFECTIVE_DATE: BerTag = BerTag::application(false, 37);
/// `5F24` expiration date
pub const EXPIRATION_DATE: BerTag = BerTag::application(false, 36);
/// `5F37` signature
pub const SIGNATURE: BerTag = BerTag::application(false, 55);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_bytes() {
        assert_eq!(CV_CERTIFICATE.encode(), vec![0x7F, 0x21]);
        assert_eq!(CERTIFICATE_BODY.encode(), vec![0x7F, 0x4E]);
        assert_eq!(PROFILE_IDENTIFIER.encode(), vec![0x5F, 0x29]);
        assert_eq!(AUTHORITY_REFERENCE.encode(), vec![0x42]);
        assert_eq!(HOLDER_AUTHORISATION.encode(), vec![0x5F, 0x4C]);
        assert_eq!(PUBLIC_KEY.encode(), vec![0x7F, 0x49]);
        assert_eq!(PUBLIC_POINT.encode(), vec![0x86]);
        assert_eq!(HOLDER_REFERENCE.encode(), vec![0x5F, 0x20]);
        assert_eq!(EFFECTIVE_DATE.encode(), vec![0x5F, 0x25]);
        assert_eq!(EXPIRATION_DATE.encode(), vec![0x5F, 0x24]);
        assert_eq!(SIGNATURE.encode(), vec![0x5F, 0x37]);
    }
}
