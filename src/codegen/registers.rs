use super::asm_ast::{Register, SCRATCH_REGISTERS};
use crate::error::InternalError;

/// Fixed pool of scratch registers. There is no spilling: running out is a
/// hard error.
#[derive(Debug)]
pub struct RegisterPool {
    free: [bool; SCRATCH_REGISTERS.len()],
    high_water: usize,
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterPool {
    pub fn new() -> Self {
        Self {
            free: [true; SCRATCH_REGISTERS.len()],
            high_water: 0,
        }
    }

    /// Lowest-numbered free register.
    pub fn allocate(&mut self) -> Result<Register, InternalError> {
        let index = self
            .free
            .iter()
            .position(|free| *free)
            .ok_or(InternalError::OutOfRegisters)?;
        self.free[index] = false;
        self.high_water = self.high_water.max(self.in_use());
        Ok(SCRATCH_REGISTERS[index])
    }

    pub fn free(&mut self, reg: Register) -> Result<(), InternalError> {
        let index = Self::index_of(reg);
        match self.free.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                Ok(())
            }
            _ => Err(InternalError::RegisterDoubleFree(index)),
        }
    }

    pub fn free_all(&mut self) {
        self.free = [true; SCRATCH_REGISTERS.len()];
    }

    pub fn in_use(&self) -> usize {
        self.free.iter().filter(|free| !**free).count()
    }

    /// Allocated registers, in allocation order.
    pub fn live(&self) -> impl Iterator<Item = Register> + '_ {
        SCRATCH_REGISTERS
            .iter()
            .zip(self.free.iter())
            .filter(|(_, free)| !**free)
            .map(|(reg, _)| *reg)
    }

    pub fn is_all_free(&self) -> bool {
        self.in_use() == 0
    }

    /// Most registers ever live at the same time.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    fn index_of(reg: Register) -> usize {
        SCRATCH_REGISTERS
            .iter()
            .position(|r| *r == reg)
            .unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocates_lowest_free() {
        let mut pool = RegisterPool::new();
        let r0 = pool.allocate().unwrap();
        let r1 = pool.allocate().unwrap();
        assert_eq!((r0, r1), (Register::R8, Register::R9));
        pool.free(r0).unwrap();
        assert_eq!(pool.allocate().unwrap(), Register::R8);
        assert_eq!(pool.in_use(), 2);
    }

    #[test]
    fn test_exhaustion() {
        let mut pool = RegisterPool::new();
        for _ in 0..4 {
            pool.allocate().unwrap();
        }
        assert_eq!(pool.allocate(), Err(InternalError::OutOfRegisters));
        assert_eq!(pool.high_water(), 4);
        pool.free_all();
        assert!(pool.is_all_free());
        assert_eq!(pool.allocate().unwrap(), Register::R8);
    }

    #[test]
    fn test_live_registers() {
        let mut pool = RegisterPool::new();
        let r0 = pool.allocate().unwrap();
        let r1 = pool.allocate().unwrap();
        let r2 = pool.allocate().unwrap();
        pool.free(r1).unwrap();
        assert_eq!(pool.live().collect::<Vec<_>>(), vec![r0, r2]);
        pool.free_all();
        assert_eq!(pool.live().count(), 0);
    }

    #[test]
    fn test_double_free() {
        let mut pool = RegisterPool::new();
        let r = pool.allocate().unwrap();
        pool.free(r).unwrap();
        assert_eq!(pool.free(r), Err(InternalError::RegisterDoubleFree(0)));
    }

    #[test]
    fn test_freeing_non_scratch_register() {
        let mut pool = RegisterPool::new();
        assert!(pool.free(Register::AX).is_err());
    }
}
