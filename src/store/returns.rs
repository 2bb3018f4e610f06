// Adapting raw pipeline/CRUD results to the return shape a store method declares
use super::declaration::ModelType;
use crate::error::{StoreError, StoreResult};
use crate::pipeline::{Document, DocumentCursor};
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

/// Return shape of a store method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnShape {
    /// `Option<T>`: first document, if any
    Optional,
    /// `PipelineStream<T>`: documents decoded lazily
    Stream,
    /// `Vec<T>`: documents decoded eagerly
    List,
    /// `u64`
    Count,
    /// `bool`
    Flag,
    /// `()`
    Unit,
}

/// Raw result of a dispatched call, before adaptation
pub enum Outcome {
    Documents(DocumentCursor),
    Count(u64),
    Flag(bool),
    Unit,
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Documents(_) => f.write_str("Documents(..)"),
            Self::Count(n) => write!(f, "Count({n})"),
            Self::Flag(b) => write!(f, "Flag({b})"),
            Self::Unit => f.write_str("Unit"),
        }
    }
}

/// Types a store method may return
pub trait StoreReturn: Sized + Send + 'static {
    const SHAPE: ReturnShape;

    /// Model type named by the return type, if any
    fn model() -> Option<ModelType> {
        None
    }

    fn from_outcome(method: &str, outcome: Outcome) -> StoreResult<Self>;
}

fn decode<T: DeserializeOwned>(method: &str, document: Document) -> StoreResult<T> {
    serde_json::from_value(document).map_err(|e| StoreError::decode(method, e))
}

impl<T: DeserializeOwned + Send + 'static> StoreReturn for Option<T> {
    const SHAPE: ReturnShape = ReturnShape::Optional;

    fn model() -> Option<ModelType> {
        Some(ModelType::of::<T>())
    }

    fn from_outcome(method: &str, outcome: Outcome) -> StoreResult<Self> {
        match outcome {
            Outcome::Documents(mut cursor) => match cursor.next() {
                Some(Ok(document)) => decode(method, document).map(Some),
                Some(Err(e)) => Err(StoreError::collaborator(method, e)),
                None => Ok(None),
            },
            _ => Err(StoreError::shape_mismatch(method, Self::SHAPE)),
        }
    }
}

impl<T: DeserializeOwned + Send + 'static> StoreReturn for Vec<T> {
    const SHAPE: ReturnShape = ReturnShape::List;

    fn model() -> Option<ModelType> {
        Some(ModelType::of::<T>())
    }

    fn from_outcome(method: &str, outcome: Outcome) -> StoreResult<Self> {
        match outcome {
            Outcome::Documents(cursor) => PipelineStream::new(method, cursor).collect_all(),
            _ => Err(StoreError::shape_mismatch(method, Self::SHAPE)),
        }
    }
}

impl<T: DeserializeOwned + Send + 'static> StoreReturn for PipelineStream<T> {
    const SHAPE: ReturnShape = ReturnShape::Stream;

    fn model() -> Option<ModelType> {
        Some(ModelType::of::<T>())
    }

    fn from_outcome(method: &str, outcome: Outcome) -> StoreResult<Self> {
        match outcome {
            Outcome::Documents(cursor) => Ok(PipelineStream::new(method, cursor)),
            _ => Err(StoreError::shape_mismatch(method, Self::SHAPE)),
        }
    }
}

impl StoreReturn for u64 {
    const SHAPE: ReturnShape = ReturnShape::Count;

    fn from_outcome(method: &str, outcome: Outcome) -> StoreResult<Self> {
        match outcome {
            Outcome::Count(n) => Ok(n),
            Outcome::Documents(cursor) => {
                let mut n = 0;
                for document in cursor {
                    document.map_err(|e| StoreError::collaborator(method, e))?;
                    n += 1;
                }
                Ok(n)
            }
            _ => Err(StoreError::shape_mismatch(method, Self::SHAPE)),
        }
    }
}

impl StoreReturn for bool {
    const SHAPE: ReturnShape = ReturnShape::Flag;

    fn from_outcome(method: &str, outcome: Outcome) -> StoreResult<Self> {
        match outcome {
            Outcome::Flag(flag) => Ok(flag),
            Outcome::Documents(mut cursor) => match cursor.next() {
                Some(Ok(_)) => Ok(true),
                Some(Err(e)) => Err(StoreError::collaborator(method, e)),
                None => Ok(false),
            },
            _ => Err(StoreError::shape_mismatch(method, Self::SHAPE)),
        }
    }
}

impl StoreReturn for () {
    const SHAPE: ReturnShape = ReturnShape::Unit;

    fn from_outcome(method: &str, outcome: Outcome) -> StoreResult<Self> {
        if let Outcome::Documents(cursor) = outcome {
            for document in cursor {
                document.map_err(|e| StoreError::collaborator(method, e))?;
            }
        }
        Ok(())
    }
}

/// Lazily decoded sequence of pipeline results
pub struct PipelineStream<T> {
    method: String,
    cursor: DocumentCursor,
    _model: PhantomData<fn() -> T>,
}

impl<T> PipelineStream<T> {
    pub fn new(method: impl Into<String>, cursor: DocumentCursor) -> Self {
        Self {
            method: method.into(),
            cursor,
            _model: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> PipelineStream<T> {
    /// Drain the stream, stopping at the first error
    pub fn collect_all(self) -> StoreResult<Vec<T>> {
        self.collect()
    }
}

impl<T: DeserializeOwned> Iterator for PipelineStream<T> {
    type Item = StoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.cursor.next()?;
        Some(match next {
            Ok(document) => decode(&self.method, document),
            Err(e) => Err(StoreError::collaborator(&self.method, e)),
        })
    }
}

impl<T> fmt::Debug for PipelineStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineStream")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
