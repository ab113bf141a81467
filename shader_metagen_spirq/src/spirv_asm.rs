//! Minimal SPIR-V assembler for backend tests
//!
//! Builds small but well-formed shader modules word by word: one or more
//! entry points with empty bodies, plus samplers, textures, storage images,
//! uniform blocks of vec4 members and float stage inputs.

use crate::spirq_loader::SPIRV_MAGIC;

// Opcodes
const OP_NAME: u32 = 5;
const OP_MEMBER_NAME: u32 = 6;
const OP_MEMORY_MODEL: u32 = 14;
const OP_ENTRY_POINT: u32 = 15;
const OP_EXECUTION_MODE: u32 = 16;
const OP_CAPABILITY: u32 = 17;
const OP_TYPE_VOID: u32 = 19;
const OP_TYPE_FLOAT: u32 = 22;
const OP_TYPE_VECTOR: u32 = 23;
const OP_TYPE_IMAGE: u32 = 25;
const OP_TYPE_SAMPLER: u32 = 26;
const OP_TYPE_SAMPLED_IMAGE: u32 = 27;
const OP_TYPE_STRUCT: u32 = 30;
const OP_TYPE_POINTER: u32 = 32;
const OP_TYPE_FUNCTION: u32 = 33;
const OP_FUNCTION: u32 = 54;
const OP_FUNCTION_END: u32 = 56;
const OP_VARIABLE: u32 = 59;
const OP_DECORATE: u32 = 71;
const OP_MEMBER_DECORATE: u32 = 72;
const OP_LABEL: u32 = 248;
const OP_RETURN: u32 = 253;

// Decorations
const DECORATION_BLOCK: u32 = 2;
const DECORATION_LOCATION: u32 = 30;
const DECORATION_BINDING: u32 = 33;
const DECORATION_DESCRIPTOR_SET: u32 = 34;
const DECORATION_OFFSET: u32 = 35;

// Storage classes
const STORAGE_UNIFORM_CONSTANT: u32 = 0;
const STORAGE_INPUT: u32 = 1;
const STORAGE_UNIFORM: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

struct Resource {
    name: String,
    set: u32,
    binding: u32,
}

/// Shader module description, assembled by `build`
pub struct ModuleBuilder {
    stages: Vec<Stage>,
    samplers: Vec<Resource>,
    textures: Vec<(Resource, bool)>,
    storage_images: Vec<(Resource, u32, bool)>,
    blocks: Vec<(Resource, String, u32)>,
    inputs: Vec<(String, u32, u32)>,
}

impl ModuleBuilder {
    pub fn new(stage: Stage) -> Self {
        Self {
            stages: vec![stage],
            samplers: Vec::new(),
            textures: Vec::new(),
            storage_images: Vec::new(),
            blocks: Vec::new(),
            inputs: Vec::new(),
        }
    }

    /// Add another `main` entry point for `stage`
    pub fn entry_point(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// `uniform sampler name;`
    pub fn sampler(mut self, name: &str, set: u32, binding: u32) -> Self {
        self.samplers.push(Resource { name: name.to_string(), set, binding });
        self
    }

    /// `uniform sampler2D name;` (or sampler2DMS)
    pub fn texture(mut self, name: &str, set: u32, binding: u32, multisampled: bool) -> Self {
        self.textures.push((Resource { name: name.to_string(), set, binding }, multisampled));
        self
    }

    /// `layout(<format>) uniform image2D name;` (or image2DMS), with the
    /// SPIR-V `ImageFormat` enumerant value as `format`
    pub fn storage_image(mut self, name: &str, set: u32, binding: u32, format: u32, multisampled: bool) -> Self {
        self.storage_images.push((Resource { name: name.to_string(), set, binding }, format, multisampled));
        self
    }

    /// `uniform type_name { vec4 m0; ... } name;`
    pub fn block(mut self, name: &str, type_name: &str, set: u32, binding: u32, members: u32) -> Self {
        self.blocks.push((
            Resource { name: name.to_string(), set, binding },
            type_name.to_string(),
            members,
        ));
        self
    }

    /// `layout(location = location) in vecN name;` (N = 1 is a float)
    pub fn input(mut self, name: &str, location: u32, components: u32) -> Self {
        self.inputs.push((name.to_string(), location, components));
        self
    }

    pub fn build(&self) -> Vec<u32> {
        let mut ids = 0u32;
        let mut next = || {
            ids += 1;
            ids
        };

        let void_ty = next();
        let fn_ty = next();
        let mains: Vec<(u32, u32)> = self.stages.iter().map(|_| (next(), next())).collect();
        let float_ty = next();
        let vec_tys: Vec<u32> = (2..=4).map(|_| next()).collect();
        let sampler_ty = next();
        let sampler_ptr = next();
        let image_tys = [next(), next()];
        let sampled_image_tys = [next(), next()];
        let sampled_image_ptrs = [next(), next()];
        // One image type per distinct (format, multisampled)
        let mut storage_keys: Vec<(u32, bool)> = Vec::new();
        for (_, format, multisampled) in &self.storage_images {
            if !storage_keys.contains(&(*format, *multisampled)) {
                storage_keys.push((*format, *multisampled));
            }
        }
        let storage_tys: Vec<(u32, u32)> = storage_keys.iter().map(|_| (next(), next())).collect();
        let input_ptrs: Vec<u32> = (1..=4).map(|_| next()).collect();

        let sampler_vars: Vec<u32> = self.samplers.iter().map(|_| next()).collect();
        let texture_vars: Vec<u32> = self.textures.iter().map(|_| next()).collect();
        let storage_vars: Vec<u32> = self.storage_images.iter().map(|_| next()).collect();
        let block_ids: Vec<(u32, u32, u32)> =
            self.blocks.iter().map(|_| (next(), next(), next())).collect();
        let input_vars: Vec<u32> = self.inputs.iter().map(|_| next()).collect();
        let bound = next();

        let vector_of = |components: u32| -> u32 {
            if components <= 1 {
                float_ty
            } else {
                vec_tys[(components - 2) as usize]
            }
        };

        let mut out = Vec::new();

        // Preamble
        emit(&mut out, OP_CAPABILITY, &[1]);
        emit(&mut out, OP_MEMORY_MODEL, &[0, 1]);
        for (stage, (main, _)) in self.stages.iter().zip(&mains) {
            let model = match stage {
                Stage::Vertex => 0,
                Stage::Fragment => 4,
            };
            let mut entry = vec![model, *main];
            entry.extend(string_words("main"));
            entry.extend(&input_vars);
            emit(&mut out, OP_ENTRY_POINT, &entry);
        }
        for (stage, (main, _)) in self.stages.iter().zip(&mains) {
            if *stage == Stage::Fragment {
                // OriginUpperLeft
                emit(&mut out, OP_EXECUTION_MODE, &[*main, 7]);
            }
        }

        // Debug names
        for (main, _) in &mains {
            emit_name(&mut out, *main, "main");
        }
        for (resource, var) in self.samplers.iter().zip(&sampler_vars) {
            emit_name(&mut out, *var, &resource.name);
        }
        for ((resource, _), var) in self.textures.iter().zip(&texture_vars) {
            emit_name(&mut out, *var, &resource.name);
        }
        for ((resource, _, _), var) in self.storage_images.iter().zip(&storage_vars) {
            emit_name(&mut out, *var, &resource.name);
        }
        for ((resource, type_name, members), (struct_ty, _, var)) in self.blocks.iter().zip(&block_ids) {
            emit_name(&mut out, *struct_ty, type_name);
            for member in 0..*members {
                let mut operands = vec![*struct_ty, member];
                operands.extend(string_words(&format!("m{}", member)));
                emit(&mut out, OP_MEMBER_NAME, &operands);
            }
            emit_name(&mut out, *var, &resource.name);
        }
        for ((name, _, _), var) in self.inputs.iter().zip(&input_vars) {
            emit_name(&mut out, *var, name);
        }

        // Decorations
        let bind = |out: &mut Vec<u32>, var: u32, resource: &Resource| {
            emit(out, OP_DECORATE, &[var, DECORATION_DESCRIPTOR_SET, resource.set]);
            emit(out, OP_DECORATE, &[var, DECORATION_BINDING, resource.binding]);
        };
        for (resource, var) in self.samplers.iter().zip(&sampler_vars) {
            bind(&mut out, *var, resource);
        }
        for ((resource, _), var) in self.textures.iter().zip(&texture_vars) {
            bind(&mut out, *var, resource);
        }
        for ((resource, _, _), var) in self.storage_images.iter().zip(&storage_vars) {
            bind(&mut out, *var, resource);
        }
        for ((resource, _, members), (struct_ty, _, var)) in self.blocks.iter().zip(&block_ids) {
            emit(&mut out, OP_DECORATE, &[*struct_ty, DECORATION_BLOCK]);
            for member in 0..*members {
                emit(&mut out, OP_MEMBER_DECORATE, &[*struct_ty, member, DECORATION_OFFSET, member * 16]);
            }
            bind(&mut out, *var, resource);
        }
        for ((_, location, _), var) in self.inputs.iter().zip(&input_vars) {
            emit(&mut out, OP_DECORATE, &[*var, DECORATION_LOCATION, *location]);
        }

        // Types
        emit(&mut out, OP_TYPE_VOID, &[void_ty]);
        emit(&mut out, OP_TYPE_FUNCTION, &[fn_ty, void_ty]);
        emit(&mut out, OP_TYPE_FLOAT, &[float_ty, 32]);
        for (i, vec_ty) in vec_tys.iter().enumerate() {
            emit(&mut out, OP_TYPE_VECTOR, &[*vec_ty, float_ty, i as u32 + 2]);
        }
        emit(&mut out, OP_TYPE_SAMPLER, &[sampler_ty]);
        emit(&mut out, OP_TYPE_POINTER, &[sampler_ptr, STORAGE_UNIFORM_CONSTANT, sampler_ty]);
        for ms in 0..2 {
            // 2D, not depth, not arrayed, ms, sampled, format Unknown
            emit(&mut out, OP_TYPE_IMAGE, &[image_tys[ms], float_ty, 1, 0, 0, ms as u32, 1, 0]);
            emit(&mut out, OP_TYPE_SAMPLED_IMAGE, &[sampled_image_tys[ms], image_tys[ms]]);
            emit(&mut out, OP_TYPE_POINTER, &[
                sampled_image_ptrs[ms],
                STORAGE_UNIFORM_CONSTANT,
                sampled_image_tys[ms],
            ]);
        }
        for ((format, multisampled), (image_ty, ptr)) in storage_keys.iter().zip(&storage_tys) {
            // 2D, not depth, not arrayed, ms, read/write (no sampler)
            emit(&mut out, OP_TYPE_IMAGE, &[*image_ty, float_ty, 1, 0, 0, *multisampled as u32, 2, *format]);
            emit(&mut out, OP_TYPE_POINTER, &[*ptr, STORAGE_UNIFORM_CONSTANT, *image_ty]);
        }
        for (i, ptr) in input_ptrs.iter().enumerate() {
            emit(&mut out, OP_TYPE_POINTER, &[*ptr, STORAGE_INPUT, vector_of(i as u32 + 1)]);
        }

        // Variables
        for var in &sampler_vars {
            emit(&mut out, OP_VARIABLE, &[sampler_ptr, *var, STORAGE_UNIFORM_CONSTANT]);
        }
        for ((_, multisampled), var) in self.textures.iter().zip(&texture_vars) {
            let ptr = sampled_image_ptrs[*multisampled as usize];
            emit(&mut out, OP_VARIABLE, &[ptr, *var, STORAGE_UNIFORM_CONSTANT]);
        }
        for ((_, format, multisampled), var) in self.storage_images.iter().zip(&storage_vars) {
            let key = storage_keys.iter().position(|k| *k == (*format, *multisampled));
            let (_, ptr) = storage_tys[key.unwrap_or(0)];
            emit(&mut out, OP_VARIABLE, &[ptr, *var, STORAGE_UNIFORM_CONSTANT]);
        }
        let vec4 = vector_of(4);
        for ((_, _, members), (struct_ty, ptr, var)) in self.blocks.iter().zip(&block_ids) {
            let mut operands = vec![*struct_ty];
            operands.extend(std::iter::repeat(vec4).take(*members as usize));
            emit(&mut out, OP_TYPE_STRUCT, &operands);
            emit(&mut out, OP_TYPE_POINTER, &[*ptr, STORAGE_UNIFORM, *struct_ty]);
            emit(&mut out, OP_VARIABLE, &[*ptr, *var, STORAGE_UNIFORM]);
        }
        for ((_, _, components), var) in self.inputs.iter().zip(&input_vars) {
            let ptr = input_ptrs[(*components).clamp(1, 4) as usize - 1];
            emit(&mut out, OP_VARIABLE, &[ptr, *var, STORAGE_INPUT]);
        }

        // void main() {} per entry point
        for (main, label) in &mains {
            emit(&mut out, OP_FUNCTION, &[void_ty, *main, 0, fn_ty]);
            emit(&mut out, OP_LABEL, &[*label]);
            emit(&mut out, OP_RETURN, &[]);
            emit(&mut out, OP_FUNCTION_END, &[]);
        }

        let mut module = vec![SPIRV_MAGIC, 0x0001_0000, 0, bound, 0];
        module.extend(out);
        module
    }
}

/// SPIR-V words as little-endian bytes (the on-disk layout)
pub fn to_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

fn emit(out: &mut Vec<u32>, opcode: u32, operands: &[u32]) {
    out.push(((operands.len() as u32 + 1) << 16) | opcode);
    out.extend_from_slice(operands);
}

fn emit_name(out: &mut Vec<u32>, target: u32, name: &str) {
    let mut operands = vec![target];
    operands.extend(string_words(name));
    emit(out, OP_NAME, &operands);
}

/// Nul-terminated UTF-8 literal, padded to whole words
fn string_words(s: &str) -> Vec<u32> {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
