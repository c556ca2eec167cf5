//! The file entry point on small hand-built dumps

use tacho::card::ElementaryFileId;
use tacho::{marshal_file, unmarshal_file, unmarshal_file_with, File, FileType, TachoError, UnmarshalOptions};

fn block(fid: u16, appendix: u8, value: &[u8]) -> Vec<u8> {
    let mut data = fid.to_be_bytes().to_vec();
    data.push(appendix);
    data.extend_from_slice(&(value.len() as u16).to_be_bytes());
    data.extend_from_slice(value);
    data
}

fn icc() -> Vec<u8> {
    let mut value = vec![0x01, 0x00, 0x00, 0x30, 0x39, 0x11, 0x19, 0x01, 0x21];
    value.extend(b"e5-0006 ");
    value.push(0x03);
    value.extend([b'F', b'R', 0x00, 0x02, 0x01]);
    value.extend([0x10, 0x20]);
    value
}

fn card_dump() -> Vec<u8> {
    let mut data = block(0x0002, 0x00, &icc());
    data.extend(block(0x050E, 0x00, &[0x00, 0x00, 0x00, 0x00]));
    data.extend(block(0x050E, 0x01, &[0x42; 128]));
    // five specific conditions, no pointer in generation 1
    let mut conditions = Vec::new();
    for i in 0..5u8 {
        conditions.extend([0x5F, 0xEE, 0x66, i, 0x01 + i % 2]);
    }
    data.extend(block(0x0522, 0x00, &conditions));
    data
}

#[test]
fn card_dump_round_trip() {
    let data = card_dump();
    let file = unmarshal_file(&data).unwrap();
    assert_eq!(file.file_type(), FileType::DriverCard);
    let File::DriverCard(card) = &file;
    assert_eq!(card.tachograph.card_download.unwrap().last_card_download, None);
    let conditions = card.tachograph.specific_conditions.as_ref().unwrap();
    assert_eq!(conditions.newest_record_pointer, None);
    assert_eq!(conditions.records.len(), 5);
    assert_eq!(marshal_file(&file).unwrap(), data);
}

#[test]
fn vehicle_unit_transfer_is_unsupported() {
    let data = [0x76, 0x01, 0x00, 0x00];
    assert!(matches!(unmarshal_file(&data), Err(TachoError::UnsupportedFileType(_))));
}

#[test]
fn unknown_leading_bytes_are_unsupported() {
    let result = unmarshal_file(&[0x05, 0x01, 0x00]);
    assert_eq!(
        result,
        Err(TachoError::UnsupportedFileType("unrecognised leading byte 0x05".to_string()))
    );
}

#[test]
fn lenient_options_pass_through() {
    let mut data = card_dump();
    data.extend(block(0x0507, 0x00, &[0x00; 7]));
    assert!(unmarshal_file(&data).is_err());

    let File::DriverCard(card) = unmarshal_file_with(&data, &UnmarshalOptions::lenient()).unwrap();
    assert_eq!(card.issues.len(), 1);
    assert_eq!(card.issues[0].file, ElementaryFileId::CurrentUsage);
}

#[test]
fn json_rendering() {
    let file = unmarshal_file_with(&card_dump(), &UnmarshalOptions::default().with_preserve_raw_data(false)).unwrap();
    let json = serde_json::to_value(&file).unwrap();
    let card = &json["DriverCard"];
    assert_eq!(card["icc"]["card_extended_serial_number"]["equipment_type"], "DriverCard");
    let records = card["tachograph"]["specific_conditions"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert!(records[0].get("raw_data").is_none());

    let back: File = serde_json::from_value(json).unwrap();
    assert_eq!(back, file);
}
