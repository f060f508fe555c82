//! ONNX Runtime sentence embeddings for multilingual transformer models.
//!
//! Expects a directory with `model.onnx` and `tokenizer.json`, as exported
//! from `paraphrase-multilingual-MiniLM-L12-v2`. Vectors are mean pooled over
//! the attention mask and L2 normalized.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::similarity::EmbeddingProvider;

/// Long judgments are truncated to this many tokens.
pub const MAX_TOKENS: usize = 128;

pub struct Embedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dim: usize,
    /// BERT-style exports take `token_type_ids`; XLM-R exports usually do not.
    wants_token_types: bool,
    model_id: String,
}

impl Embedder {
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;
        let dim = infer_dim(session.outputs()[0].dtype()).unwrap_or(384);
        let wants_token_types = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;
        tokenizer.with_padding(Some(tokenizers::PaddingParams::default()));

        let model_id = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| model_dir.display().to_string());

        info!(dim, wants_token_types, model = %model_id, "loaded embedding model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dim,
            wants_token_types,
            model_id,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn run(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let batch = texts.len();

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut ids = vec![0i64; batch * seq_len];
        let mut mask = vec![0i64; batch * seq_len];
        let mut types = vec![0i64; batch * seq_len];
        for (i, enc) in encodings.iter().enumerate() {
            let row = i * seq_len;
            let cells = enc
                .get_ids()
                .iter()
                .zip(enc.get_attention_mask())
                .zip(enc.get_type_ids());
            for (j, ((&id, &m), &t)) in cells.enumerate() {
                ids[row + j] = i64::from(id);
                mask[row + j] = i64::from(m);
                types[row + j] = i64::from(t);
            }
        }

        let shape = [batch as i64, seq_len as i64];
        let ids_tensor = Tensor::from_array((shape, ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, mask.clone().into_boxed_slice()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("embedding session poisoned"))?;
        let outputs = if self.wants_token_types {
            let types_tensor = Tensor::from_array((shape, types.into_boxed_slice()))?;
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => types_tensor,
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ])?
        };

        let (out_shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = out_shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] as usize == batch && dims[2] as usize == self.dim,
            "unexpected output shape {dims:?}, expected [{batch}, {seq_len}, {}]",
            self.dim
        );
        let out_len = dims[1] as usize;

        Ok((0..batch)
            .map(|i| mean_pool(data, &mask[i * seq_len..(i + 1) * seq_len], i, out_len, self.dim))
            .collect())
    }
}

/// Average the token vectors of row `i` where the mask is set, then normalize.
fn mean_pool(data: &[f32], mask: &[i64], i: usize, seq_len: usize, dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    let mut count = 0.0f32;
    for (j, &m) in mask.iter().take(seq_len).enumerate() {
        if m == 0 {
            continue;
        }
        let offset = (i * seq_len + j) * dim;
        for (p, x) in pooled.iter_mut().zip(&data[offset..offset + dim]) {
            *p += x;
        }
        count += 1.0;
    }
    if count > 0.0 {
        pooled.iter_mut().for_each(|p| *p /= count);
    }
    normalize(&mut pooled);
    pooled
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

fn infer_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => {
            shape.last().and_then(|&d| (d > 0).then_some(d as usize))
        }
        _ => None,
    }
}

impl EmbeddingProvider for Embedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.run(&[text])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("model produced no embedding"))
    }

    fn embed_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.run(texts)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
