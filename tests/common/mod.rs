//! Shared helpers for integration tests

#![allow(dead_code)]

use cv_ranker::error::Result;
use cv_ranker::processing::embeddings::Embedder;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Bag-of-words vectors over hashed buckets, L2-normalized.
/// Deterministic and good enough to make shared words raise similarity.
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn bucket(&self, word: &str) -> usize {
        let hash = word
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3));
        (hash % self.dimensions as u64) as usize
    }
}

impl Embedder for HashingEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; self.dimensions];
                for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
                    if !word.is_empty() {
                        vector[self.bucket(word)] += 1.0;
                    }
                }
                let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm > 0.0 {
                    vector.iter_mut().for_each(|x| *x /= norm);
                }
                vector
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "hashing-test-embedder"
    }
}

/// A one-page PDF whose text layer holds `text`
pub fn text_pdf(text: &str) -> Vec<u8> {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    build_pdf(content)
}

/// A one-page PDF with no text at all, like a scan without OCR
pub fn empty_pdf() -> Vec<u8> {
    build_pdf(Content { operations: vec![] })
}

fn build_pdf(content: Content) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let encoded = content.encode().expect("content encodes");
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("pdf serializes");
    bytes
}
