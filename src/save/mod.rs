mod bridge;
mod codec;
mod model;
mod store;

pub use bridge::{apply_save_data, save_data_from_game};
pub use codec::{export_to_base64, import_from_base64, load_from_json_string, save_to_json_string};
pub use model::{
    SAVE_VERSION, SaveCycle, SaveData, SaveItemCount, SavePrice, SaveRabbit, SaveSearch, SaveUnit,
};
pub use store::{
    Autosave, DEFAULT_AUTOSAVE_DEBOUNCE_MS, FileStorage, KeyValueStorage, MemoryStorage,
    Persistence, STORAGE_KEY,
};
