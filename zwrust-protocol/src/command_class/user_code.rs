//! User Code command class (0x63)

use zwrust_core::{PayloadCursor, SendData, StringEncoding};
use zwrust_types::{CommandClassId, EventKind};

use super::{CommandClassHandler, DecodeOutput, HandlerBase, HandlerContext, HandlerType};
use crate::error::{DecodeError, Error, Result};

const SET: u8 = 0x01;
const GET: u8 = 0x02;
const REPORT: u8 = 0x03;
const USERS_NUMBER_GET: u8 = 0x04;
const USERS_NUMBER_REPORT: u8 = 0x05;

const MIN_CODE_LEN: usize = 4;
const MAX_CODE_LEN: usize = 10;

/// User id status values
pub mod status {
    pub const AVAILABLE: u8 = 0x00;
    pub const OCCUPIED: u8 = 0x01;
    pub const RESERVED: u8 = 0x02;
    pub const NOT_AVAILABLE: u8 = 0xFE;
}

#[derive(Debug)]
pub struct UserCodeHandler {
    base: HandlerBase,
    users: Option<u8>,
}

impl UserCodeHandler {
    /// Number of user slots, once reported
    pub fn users(&self) -> Option<u8> {
        self.users
    }

    pub fn encode_get(&self, user_id: u8) -> Result<SendData> {
        check_user(user_id)?;
        Ok(self.base.message(GET, &[user_id]))
    }

    /// Store `code` (4 to 10 ASCII digits) in slot `user_id`
    pub fn encode_set(&self, user_id: u8, code: &str) -> Result<SendData> {
        check_user(user_id)?;
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len()) || !code.is_ascii() {
            return Err(Error::InvalidArgument(format!("user code length {}", code.len())));
        }
        let mut args = vec![user_id, status::OCCUPIED];
        args.extend_from_slice(code.as_bytes());
        Ok(self.base.message(SET, &args))
    }

    /// Free slot `user_id`
    pub fn encode_clear(&self, user_id: u8) -> Result<SendData> {
        check_user(user_id)?;
        Ok(self
            .base
            .message(SET, &[user_id, status::AVAILABLE, 0x00, 0x00, 0x00, 0x00]))
    }

    pub fn encode_users_number_get(&self) -> SendData {
        self.base.message(USERS_NUMBER_GET, &[])
    }
}

fn check_user(user_id: u8) -> Result<()> {
    if user_id == 0 {
        return Err(Error::InvalidArgument("user id 0".into()));
    }
    Ok(())
}

impl HandlerType for UserCodeHandler {
    const ID: CommandClassId = CommandClassId::UserCode;
    const MAX_VERSION: u8 = 1;

    fn new(context: HandlerContext) -> Self {
        Self {
            base: HandlerBase::new(Self::ID, context, Self::MAX_VERSION),
            users: None,
        }
    }
}

impl CommandClassHandler for UserCodeHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase {
        &mut self.base
    }

    fn handle<'a>(
        &mut self,
        command: u8,
        cursor: &mut PayloadCursor<'a>,
        out: &mut DecodeOutput<'a>,
    ) -> std::result::Result<(), DecodeError> {
        match command {
            REPORT => {
                let user_id = cursor.read_u8()?;
                let status = cursor.read_u8()?;
                let len = cursor.remaining().min(MAX_CODE_LEN);
                let code = cursor.read_fixed_string(len, StringEncoding::Ascii)?;
                out.push(EventKind::UserCode { user_id, status, code });
            }
            USERS_NUMBER_REPORT => {
                let count = cursor.read_u8()?;
                self.users = Some(count);
                out.push(EventKind::UserCodeCount { count });
            }
            _ => return self.base.ignore(command),
        }
        Ok(())
    }
}
