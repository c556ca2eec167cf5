//! Driver card dump document
//!
//! [`DriverCardFile::unmarshal`] splits a dump into blocks and decodes every
//! elementary file it knows. Blocks it cannot place (unknown FIDs, files of
//! other card types, repeated files) are kept verbatim, and the order in
//! which blocks were read is remembered so that [`DriverCardFile::marshal`]
//! reproduces an unmodified dump byte for byte.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tacho_core::enums::EquipmentType;
use tacho_core::error::TachoResult;
use tacho_core::version::{Generation, Version};
use tacho_core::Record;
use tacho_records::{CardChipIdentification, CardIccIdentification};

use crate::application::DriverCardApplication;
use crate::block::{join_blocks, split_blocks, Block, APPENDIX_DATA_GEN2};
use crate::file_id::ElementaryFileId;
use crate::options::UnmarshalOptions;

/// Context of the generation 2 application, if the dump has one
///
/// EF Application_Identification_V2 marks a data version 2 card. It sorts
/// after the files whose layout it changes, so the whole dump is scanned
/// before anything is decoded.
fn gen2_version(blocks: &[Block]) -> Option<Version> {
    let mut version = None;
    for block in blocks {
        if block.appendix != APPENDIX_DATA_GEN2 {
            continue;
        }
        if block.file == ElementaryFileId::ApplicationIdentificationV2 {
            return Some(Version::GEN2_V2);
        }
        version = Some(Version::GEN2);
    }
    version
}

/// Position of a block in the dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockSlot {
    Icc,
    Ic,
    Data { generation: Generation, file: ElementaryFileId },
    Signature { generation: Generation, file: ElementaryFileId },
    /// Index into [`DriverCardFile::raw_blocks`]
    Raw(usize),
}

/// A block that failed to decode in lenient mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub file: ElementaryFileId,
    pub appendix: u8,
    pub message: String,
}

/// Decoded driver card dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverCardFile {
    pub icc: Option<CardIccIdentification>,
    pub ic: Option<CardChipIdentification>,
    /// Generation 1 application, present on every card
    pub tachograph: DriverCardApplication,
    /// Generation 2 application of a generation 2 card
    pub tachograph_g2: Option<DriverCardApplication>,
    pub raw_blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    layout: Vec<BlockSlot>,
}

impl Default for DriverCardFile {
    fn default() -> Self {
        Self {
            icc: None,
            ic: None,
            tachograph: DriverCardApplication::new(Version::GEN1),
            tachograph_g2: None,
            raw_blocks: Vec::new(),
            issues: Vec::new(),
            layout: Vec::new(),
        }
    }
}

impl DriverCardFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a card dump
    ///
    /// # Errors
    /// Framing errors always; elementary-file errors only in strict mode.
    pub fn unmarshal(data: &[u8], options: &UnmarshalOptions) -> TachoResult<Self> {
        let data = Bytes::copy_from_slice(data);
        Self::from_blocks(split_blocks(&data)?, options)
    }

    /// Build the document from already split blocks
    pub fn from_blocks(blocks: Vec<Block>, options: &UnmarshalOptions) -> TachoResult<Self> {
        let mut file = Self::new();
        if let Some(version) = gen2_version(&blocks) {
            file.tachograph_g2 = Some(DriverCardApplication::new(version));
        }
        for block in blocks {
            file.place_block(block, options)?;
        }
        if file
            .tachograph_g2
            .as_ref()
            .is_some_and(|g2| g2.present_files().is_empty() && g2.signatures.is_empty())
        {
            file.tachograph_g2 = None;
        }
        if !options.preserve_raw_data {
            file.clear_raw_data();
        }
        Ok(file)
    }

    fn place_block(&mut self, block: Block, options: &UnmarshalOptions) -> TachoResult<()> {
        let slot = match self.decode_block(&block) {
            Ok(Some(slot)) => slot,
            Ok(None) => self.keep_raw(block),
            Err(e) if options.strict => return Err(e),
            Err(e) => {
                log::warn!("keeping {} (appendix 0x{:02X}) raw: {}", block.file, block.appendix, e);
                self.issues.push(Issue {
                    file: block.file,
                    appendix: block.appendix,
                    message: e.to_string(),
                });
                self.keep_raw(block)
            }
        };
        self.layout.push(slot);
        Ok(())
    }

    fn keep_raw(&mut self, block: Block) -> BlockSlot {
        self.raw_blocks.push(block);
        BlockSlot::Raw(self.raw_blocks.len() - 1)
    }

    /// Decode `block` into its slot, or `None` when it stays raw
    fn decode_block(&mut self, block: &Block) -> TachoResult<Option<BlockSlot>> {
        if block.appendix > 0x03 {
            return Ok(None);
        }
        let generation = block.generation();
        let file = block.file;
        if block.is_signature() {
            return Ok(self.attach_signature(block));
        }
        let slot = match file {
            ElementaryFileId::Icc if self.icc.is_none() => {
                self.icc = Some(CardIccIdentification::decode(&block.value, &block.version())?);
                Some(BlockSlot::Icc)
            }
            ElementaryFileId::Ic if self.ic.is_none() => {
                self.ic = Some(CardChipIdentification::decode(&block.value, &block.version())?);
                Some(BlockSlot::Ic)
            }
            ElementaryFileId::Icc | ElementaryFileId::Ic | ElementaryFileId::Unknown(_) => None,
            _ if !self.is_driver_card() => None,
            _ => {
                let application = match generation {
                    Generation::Generation1 => &mut self.tachograph,
                    Generation::Generation2 => self
                        .tachograph_g2
                        .get_or_insert_with(|| DriverCardApplication::new(Version::GEN2)),
                };
                if application.decode_file(file, &block.value)? {
                    Some(BlockSlot::Data { generation, file })
                } else {
                    None
                }
            }
        };
        if slot.is_some() {
            log::debug!("decoded {} ({}, {} bytes)", file, generation, block.value.len());
        }
        Ok(slot)
    }

    /// Attach a signature block to the data block just before it
    fn attach_signature(&mut self, block: &Block) -> Option<BlockSlot> {
        let generation = block.generation();
        let Some(BlockSlot::Data { generation: data_generation, file }) = self.layout.last().copied() else {
            return None;
        };
        if data_generation != generation || file != block.file {
            return None;
        }
        let application = self.application_mut(generation)?;
        if application.signature(file).is_some() {
            return None;
        }
        application.set_signature(file, block.value.clone());
        Some(BlockSlot::Signature { generation, file })
    }

    /// Equipment type recorded in EF_ICC
    pub fn card_type(&self) -> Option<EquipmentType> {
        self.icc
            .as_ref()
            .map(|icc| icc.card_extended_serial_number.equipment_type)
    }

    /// Whether the application files are read as a driver card's
    ///
    /// A dump without EF_ICC is assumed to be a driver card.
    pub fn is_driver_card(&self) -> bool {
        self.card_type()
            .is_none_or(|card_type| card_type == EquipmentType::DriverCard)
    }

    pub fn application(&self, generation: Generation) -> Option<&DriverCardApplication> {
        match generation {
            Generation::Generation1 => Some(&self.tachograph),
            Generation::Generation2 => self.tachograph_g2.as_ref(),
        }
    }

    pub fn application_mut(&mut self, generation: Generation) -> Option<&mut DriverCardApplication> {
        match generation {
            Generation::Generation1 => Some(&mut self.tachograph),
            Generation::Generation2 => self.tachograph_g2.as_mut(),
        }
    }

    /// Block order used by [`DriverCardFile::marshal`]
    ///
    /// The order blocks were read in, followed by every held value that has
    /// no position yet, in dump order.
    pub fn slots(&self) -> Vec<BlockSlot> {
        let mut slots = self.layout.clone();
        for slot in self.canonical_slots() {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        slots
    }

    fn canonical_slots(&self) -> Vec<BlockSlot> {
        let mut slots = Vec::new();
        if self.icc.is_some() {
            slots.push(BlockSlot::Icc);
        }
        if self.ic.is_some() {
            slots.push(BlockSlot::Ic);
        }
        for application in [Some(&self.tachograph), self.tachograph_g2.as_ref()].into_iter().flatten() {
            let generation = application.generation();
            for file in application.present_files() {
                slots.push(BlockSlot::Data { generation, file });
                if application.signature(file).is_some() {
                    slots.push(BlockSlot::Signature { generation, file });
                }
            }
        }
        slots.extend((0..self.raw_blocks.len()).map(BlockSlot::Raw));
        slots
    }

    /// Re-encode the blocks of the document
    ///
    /// Slots whose value has since been removed are skipped.
    pub fn blocks(&self) -> TachoResult<Vec<Block>> {
        let mut blocks = Vec::new();
        for slot in self.slots() {
            let block = match slot {
                BlockSlot::Icc => self
                    .icc
                    .as_ref()
                    .map(|icc| icc.encode(&Version::GEN1))
                    .transpose()?
                    .map(|value| Block::data(ElementaryFileId::Icc, Generation::Generation1, value)),
                BlockSlot::Ic => self
                    .ic
                    .as_ref()
                    .map(|ic| ic.encode(&Version::GEN1))
                    .transpose()?
                    .map(|value| Block::data(ElementaryFileId::Ic, Generation::Generation1, value)),
                BlockSlot::Data { generation, file } => match self.application(generation) {
                    Some(application) => application
                        .encode_file(file)?
                        .map(|value| Block::data(file, generation, value)),
                    None => None,
                },
                BlockSlot::Signature { generation, file } => self
                    .application(generation)
                    .and_then(|application| application.signature(file))
                    .map(|signature| Block::signature(file, generation, signature.clone())),
                BlockSlot::Raw(index) => self.raw_blocks.get(index).cloned(),
            };
            blocks.extend(block);
        }
        Ok(blocks)
    }

    /// Encode the document back to a dump
    pub fn marshal(&self) -> TachoResult<Vec<u8>> {
        join_blocks(&self.blocks()?)
    }

    /// Drop the originating bytes of every record
    ///
    /// Afterwards [`DriverCardFile::marshal`] writes reserved bits and
    /// padding as zero.
    pub fn clear_raw_data(&mut self) {
        if let Some(icc) = &mut self.icc {
            icc.clear_raw_data();
        }
        self.tachograph.clear_raw_data();
        if let Some(g2) = &mut self.tachograph_g2 {
            g2.clear_raw_data();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{APPENDIX_DATA_GEN1, APPENDIX_SIGNATURE_GEN1};
    use tacho_core::enums::PositionAuthenticationStatus;

    fn icc(equipment_type: u8) -> Vec<u8> {
        let mut value = vec![0u8; CardIccIdentification::LENGTH];
        value[0] = 0x01;
        value[1..5].copy_from_slice(&[0x00, 0x01, 0x02, 0x03]);
        value[5..7].copy_from_slice(&[0x03, 0x21]);
        value[7] = equipment_type;
        value[8] = 0x40;
        value[9..17].copy_from_slice(b"e1-84   ");
        value[18..20].copy_from_slice(b"DE");
        value
    }

    fn dump(blocks: &[Block]) -> Vec<u8> {
        join_blocks(blocks).unwrap()
    }

    #[test]
    fn test_unknown_file_kept_raw() {
        let blocks = [
            Block::new(ElementaryFileId::Icc, APPENDIX_DATA_GEN1, icc(0x01)),
            Block::new(ElementaryFileId::Unknown(0x0599), APPENDIX_DATA_GEN1, vec![1, 2, 3]),
            Block::new(ElementaryFileId::CardDownload, APPENDIX_DATA_GEN1, vec![0x5F, 0xEE, 0x66, 0x00]),
            Block::new(ElementaryFileId::CardDownload, APPENDIX_SIGNATURE_GEN1, vec![0xAA; 128]),
        ];
        let data = dump(&blocks);
        let file = DriverCardFile::unmarshal(&data, &UnmarshalOptions::default()).unwrap();
        assert_eq!(file.card_type(), Some(EquipmentType::DriverCard));
        assert_eq!(file.raw_blocks.len(), 1);
        assert_eq!(file.raw_blocks[0].file, ElementaryFileId::Unknown(0x0599));
        assert_eq!(file.tachograph.signature(ElementaryFileId::CardDownload).map(|s| s.len()), Some(128));
        assert!(file.tachograph_g2.is_none());
        assert_eq!(file.marshal().unwrap(), data);
    }

    #[test]
    fn test_signature_without_data_kept_raw() {
        let blocks = [Block::new(ElementaryFileId::Places, APPENDIX_SIGNATURE_GEN1, vec![0xAA; 128])];
        let file = DriverCardFile::from_blocks(blocks.to_vec(), &UnmarshalOptions::default()).unwrap();
        assert_eq!(file.raw_blocks.len(), 1);
        assert!(file.tachograph.signatures.is_empty());
    }

    #[test]
    fn test_other_card_types_keep_application_raw() {
        let blocks = [
            Block::new(ElementaryFileId::Icc, APPENDIX_DATA_GEN1, icc(0x02)),
            Block::new(ElementaryFileId::CardDownload, APPENDIX_DATA_GEN1, vec![0x5F, 0xEE, 0x66, 0x00]),
        ];
        let data = dump(&blocks);
        let file = DriverCardFile::unmarshal(&data, &UnmarshalOptions::default()).unwrap();
        assert_eq!(file.card_type(), Some(EquipmentType::WorkshopCard));
        assert!(file.tachograph.card_download.is_none());
        assert_eq!(file.raw_blocks.len(), 1);
        assert_eq!(file.marshal().unwrap(), data);
    }

    #[test]
    fn test_lenient_mode_records_issue() {
        let blocks = [Block::new(ElementaryFileId::CurrentUsage, APPENDIX_DATA_GEN1, vec![0u8; 3])];
        let data = dump(&blocks);
        assert!(DriverCardFile::unmarshal(&data, &UnmarshalOptions::default()).is_err());

        let file = DriverCardFile::unmarshal(&data, &UnmarshalOptions::lenient()).unwrap();
        assert_eq!(file.issues.len(), 1);
        assert_eq!(file.issues[0].file, ElementaryFileId::CurrentUsage);
        assert_eq!(file.marshal().unwrap(), data);
    }

    #[test]
    fn test_values_added_after_decode_are_appended() {
        let mut file = DriverCardFile::new();
        file.tachograph.card_download = Some(crate::application::CardDownload::default());
        let blocks = file.blocks().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].file, ElementaryFileId::CardDownload);
        assert_eq!(blocks[0].value.as_ref(), &[0u8; 4]);
    }

    fn gen2_places(authenticated: bool) -> Vec<u8> {
        let mut value = vec![0x00, 0x00, 0x5F, 0xEE, 0x66, 0x00, 0x00, 0x0D, 0x00, 0x00, 0x00, 0x64];
        value.extend_from_slice(&[0x5F, 0xEE, 0x66, 0x00, 0x0C, 0x00, 0x14, 0x88, 0xFF, 0xFA, 0xC2]);
        if authenticated {
            value.push(0x01);
        }
        value
    }

    #[test]
    fn test_v2_identification_selects_places_layout() {
        let identification_v2 = vec![0x00, 0x07, 0x00, 0x3A, 0x00, 0x7C, 0x00, 0x3E, 0x03];
        let blocks = [
            Block::new(ElementaryFileId::Places, APPENDIX_DATA_GEN2, gen2_places(true)),
            Block::new(ElementaryFileId::ApplicationIdentificationV2, APPENDIX_DATA_GEN2, identification_v2),
        ];
        let data = dump(&blocks);
        let file = DriverCardFile::unmarshal(&data, &UnmarshalOptions::default()).unwrap();
        let g2 = file.tachograph_g2.as_ref().unwrap();
        assert_eq!(g2.version, Version::GEN2_V2);
        let gnss = g2.places.as_ref().unwrap().records[0].entry_gnss_place_record.as_ref().unwrap();
        assert_eq!(gnss.authentication_status, Some(PositionAuthenticationStatus::Authenticated));
        assert_eq!(file.marshal().unwrap(), data);

        let blocks = [Block::new(ElementaryFileId::Places, APPENDIX_DATA_GEN2, gen2_places(false))];
        let data = dump(&blocks);
        let file = DriverCardFile::unmarshal(&data, &UnmarshalOptions::default()).unwrap();
        let g2 = file.tachograph_g2.as_ref().unwrap();
        assert_eq!(g2.version, Version::GEN2);
        assert!(g2.places.as_ref().unwrap().records[0]
            .entry_gnss_place_record
            .as_ref()
            .unwrap()
            .authentication_status
            .is_none());
        assert_eq!(file.marshal().unwrap(), data);
    }
}
