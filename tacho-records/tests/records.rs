use tacho_records::{
    CardEventRecord, CardVehicleRecord, FullCardNumber, PlaceRecord, Record, TachoError, Version,
    VehicleRegistrationIdentification,
};

fn registration() -> Vec<u8> {
    let mut data = vec![0x0D, 0x01];
    data.extend_from_slice(b"B-TC 1234    ");
    data
}

fn event(code: u8, begin: u32) -> Vec<u8> {
    let mut data = vec![code];
    data.extend_from_slice(&begin.to_be_bytes());
    data.extend_from_slice(&(begin + 60).to_be_bytes());
    data.extend(registration());
    data
}

#[test]
fn test_decode_many_events() {
    let mut data = event(0x05, 0x5FEE_6600);
    data.extend(event(0x07, 0x5FEE_7000));
    data.extend(vec![0u8; 24]);
    let events = CardEventRecord::decode_many(&data, &Version::GEN1).unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[1].begin_time.map(|t| t.seconds()), Some(0x5FEE_7000));
    assert!(events[2].begin_time.is_none());

    let encoded: Vec<u8> = events
        .iter()
        .map(|e| e.encode(&Version::GEN1))
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
        .concat();
    assert_eq!(encoded, data);
}

#[test]
fn test_decode_many_rejects_partial_record() {
    let mut data = event(0x05, 0x5FEE_6600);
    data.push(0);
    assert!(matches!(
        CardEventRecord::decode_many(&data, &Version::GEN1),
        Err(TachoError::InvalidLength { actual: 25, .. })
    ));
}

#[test]
fn test_place_records_follow_generation() {
    let gen1 = vec![0u8; 10 * 3];
    let gen2 = vec![0u8; 21 * 2];
    assert_eq!(PlaceRecord::decode_many(&gen1, &Version::GEN1).unwrap().len(), 3);
    assert_eq!(PlaceRecord::decode_many(&gen2, &Version::GEN2).unwrap().len(), 2);
    assert!(PlaceRecord::decode_many(&gen1, &Version::GEN2).is_err());
}

#[test]
fn test_generation_dependent_absent_records() {
    assert_eq!(CardVehicleRecord::encode_absent(Some(&Version::GEN1)).unwrap().len(), 31);
    assert_eq!(CardVehicleRecord::encode_absent(Some(&Version::GEN2)).unwrap().len(), 48);
    assert!(matches!(
        CardVehicleRecord::encode_absent(None),
        Err(TachoError::UnknownGeneration { .. })
    ));
    assert_eq!(FullCardNumber::encode_optional(None, None).unwrap(), vec![0u8; 18]);
}

#[test]
fn test_json_rendering() {
    let record = VehicleRegistrationIdentification::decode(&registration(), &Version::GEN1).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["nation"], "Germany");
    assert_eq!(json["number"]["value"], "B-TC 1234");
    assert_eq!(json["number"]["code_page"], "Iso8859_1");

    let mut stripped = record.clone();
    stripped.clear_raw_data();
    let json = serde_json::to_string(&stripped).unwrap();
    assert!(!json.contains("raw"));
    let back: VehicleRegistrationIdentification = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stripped);
}
