//! 集合存储：按 key 整体读取、整体覆盖写入的扁平 JSON 集合。

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::PathBuf,
    sync::RwLock,
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::api::error::ApiError;

/// 单个集合：记录 key（通常是 username）到记录值。
pub type Collection = serde_json::Map<String, Value>;

/// 存储抽象，鉴权闸门与各服务 handler 只依赖这两个操作。
pub trait CollectionStore: Send + Sync {
    /// 读取整个集合；读取或解析失败时退化为空集合。
    fn load(&self, key: &str) -> Collection;

    /// 用给定集合整体覆盖写入。
    fn save(&self, key: &str, collection: &Collection) -> Result<(), ApiError>;
}

/// 以 `<dir>/<key>.json` 落盘的集合存储。
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 集合文件路径。
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CollectionStore for JsonFileStore {
    fn load(&self, key: &str) -> Collection {
        let path = self.path_for(key);
        if !path.exists() {
            return Collection::new();
        }
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("read collection {} failed: {err}", path.display());
                return Collection::new();
            }
        };
        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("collection {} is not a JSON object", path.display());
                Collection::new()
            }
            Err(err) => {
                warn!("decode collection {} failed: {err}", path.display());
                Collection::new()
            }
        }
    }

    fn save(&self, key: &str, collection: &Collection) -> Result<(), ApiError> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            ApiError::storage(format!("Error saving {key} data: create dir failed: {err}"))
        })?;
        let encoded = serde_json::to_vec_pretty(collection)
            .map_err(|err| ApiError::storage(format!("Error saving {key} data: {err}")))?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, encoded)
            .map_err(|err| ApiError::storage(format!("Error saving {key} data: {err}")))?;
        fs::rename(&tmp, &path)
            .map_err(|err| ApiError::storage(format!("Error saving {key} data: {err}")))
    }
}

/// 进程内集合存储，测试与临时运行使用。
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for MemoryStore {
    fn load(&self, key: &str) -> Collection {
        let guard = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.get(key).cloned().unwrap_or_default()
    }

    fn save(&self, key: &str, collection: &Collection) -> Result<(), ApiError> {
        let mut guard = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(key.to_string(), collection.clone());
        Ok(())
    }
}

/// 读取集合并逐条解码为 `T`；无法解码的记录记日志后跳过。
pub fn load_records<T: DeserializeOwned>(
    store: &dyn CollectionStore,
    key: &str,
) -> BTreeMap<String, T> {
    store
        .load(key)
        .into_iter()
        .filter_map(|(id, raw)| match serde_json::from_value::<T>(raw) {
            Ok(record) => Some((id, record)),
            Err(err) => {
                warn!("skip undecodable record {key}/{id}: {err}");
                None
            }
        })
        .collect()
}

/// 把强类型记录编码后整体写回集合。
pub fn save_records<T: Serialize>(
    store: &dyn CollectionStore,
    key: &str,
    records: &BTreeMap<String, T>,
) -> Result<(), ApiError> {
    let mut collection = Collection::new();
    for (id, record) in records {
        let value = serde_json::to_value(record)
            .map_err(|err| ApiError::storage(format!("Error saving {key} data: {err}")))?;
        collection.insert(id.clone(), value);
    }
    store.save(key, &collection)
}

/// 读取某个用户名下的记录列表；不存在时为空。
pub fn owned_list<T: DeserializeOwned>(
    store: &dyn CollectionStore,
    key: &str,
    owner: &str,
) -> Vec<T> {
    load_records::<Vec<T>>(store, key)
        .remove(owner)
        .unwrap_or_default()
}

/// 向某个用户名下的列表追加一条记录并整体写回，返回追加后的条数。
pub fn push_owned<T: Serialize + DeserializeOwned>(
    store: &dyn CollectionStore,
    key: &str,
    owner: &str,
    record: T,
) -> Result<usize, ApiError> {
    let mut records = load_records::<Vec<T>>(store, key);
    let list = records.entry(owner.to_string()).or_default();
    list.push(record);
    let count = list.len();
    save_records(store, key, &records)?;
    Ok(count)
}
