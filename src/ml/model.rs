use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        pool::{AdaptiveAvgPool1d, AdaptiveAvgPool1dConfig, MaxPool1d, MaxPool1dConfig},
        BatchNorm, BatchNormConfig,
        Linear, LinearConfig,
        PaddingConfig1d,
    },
    prelude::*,
    tensor::activation::relu,
};

/// ResNet over 1-D signals. The default block layout is ResNet-18.
#[derive(Config, Debug)]
pub struct ResNetConfig {
    #[config(default = 1)]
    pub in_channels: usize,
    #[config(default = 1000)]
    pub num_classes: usize,
    /// Width of the stem and first stage; stage i has base_width << i channels.
    #[config(default = 64)]
    pub base_width:  usize,
    /// Residual blocks per stage.
    #[config(default = "vec![2, 2, 2, 2]")]
    pub blocks:      Vec<usize>,
}

impl ResNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ResNet<B> {
        let stem_conv = Conv1dConfig::new(self.in_channels, self.base_width, 7)
            .with_stride(2)
            .with_padding(PaddingConfig1d::Explicit(3))
            .with_bias(false)
            .init(device);
        let stem_bn   = BatchNormConfig::new(self.base_width).init(device);
        let stem_pool = MaxPool1dConfig::new(3)
            .with_stride(2)
            .with_padding(PaddingConfig1d::Explicit(1))
            .init();

        let mut channels = self.base_width;
        let stages = self.blocks
            .iter()
            .enumerate()
            .map(|(i, &depth)| {
                let width  = self.base_width << i;
                let stride = if i == 0 { 1 } else { 2 };
                let stage  = build_stage(channels, width, depth, stride, device);
                channels = width;
                stage
            })
            .collect();

        let avg_pool = AdaptiveAvgPool1dConfig::new(1).init();
        let fc       = LinearConfig::new(channels, self.num_classes).init(device);

        ResNet { stem_conv, stem_bn, stem_pool, stages, avg_pool, fc, fc_in_features: channels }
    }
}

fn build_stage<B: Backend>(
    channels_in: usize,
    width:       usize,
    depth:       usize,
    stride:      usize,
    device:      &B::Device,
) -> Stage<B> {
    let blocks = (0..depth)
        .map(|j| {
            if j == 0 {
                BasicBlock::new(channels_in, width, stride, device)
            } else {
                BasicBlock::new(width, width, 1, device)
            }
        })
        .collect();
    Stage { blocks }
}

#[derive(Module, Debug)]
pub struct BasicBlock<B: Backend> {
    pub conv1:      Conv1d<B>,
    pub bn1:        BatchNorm<B, 1>,
    pub conv2:      Conv1d<B>,
    pub bn2:        BatchNorm<B, 1>,
    pub downsample: Option<Downsample<B>>,
}

/// 1x1 projection on the skip path when the shape changes.
#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    pub conv: Conv1d<B>,
    pub bn:   BatchNorm<B, 1>,
}

impl<B: Backend> BasicBlock<B> {
    fn new(channels_in: usize, channels_out: usize, stride: usize, device: &B::Device) -> Self {
        let conv3 = |c_in, s| {
            Conv1dConfig::new(c_in, channels_out, 3)
                .with_stride(s)
                .with_padding(PaddingConfig1d::Explicit(1))
                .with_bias(false)
                .init(device)
        };

        let downsample = (stride != 1 || channels_in != channels_out).then(|| Downsample {
            conv: Conv1dConfig::new(channels_in, channels_out, 1)
                .with_stride(stride)
                .with_bias(false)
                .init(device),
            bn: BatchNormConfig::new(channels_out).init(device),
        });

        Self {
            conv1: conv3(channels_in, stride),
            bn1:   BatchNormConfig::new(channels_out).init(device),
            conv2: conv3(channels_out, 1),
            bn2:   BatchNormConfig::new(channels_out).init(device),
            downsample,
        }
    }

    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let identity = match &self.downsample {
            Some(d) => d.bn.forward(d.conv.forward(x.clone())),
            None    => x.clone(),
        };

        let out = relu(self.bn1.forward(self.conv1.forward(x)));
        let out = self.bn2.forward(self.conv2.forward(out));
        relu(out + identity)
    }
}

#[derive(Module, Debug)]
pub struct Stage<B: Backend> {
    pub blocks: Vec<BasicBlock<B>>,
}

#[derive(Module, Debug)]
pub struct ResNet<B: Backend> {
    pub stem_conv:      Conv1d<B>,
    pub stem_bn:        BatchNorm<B, 1>,
    pub stem_pool:      MaxPool1d,
    pub stages:         Vec<Stage<B>>,
    pub avg_pool:       AdaptiveAvgPool1d,
    pub fc:             Linear<B>,
    pub fc_in_features: usize,
}

impl<B: Backend> ResNet<B> {
    /// Swap the classification head for a fresh `Linear(fc_in_features, num_classes)`.
    pub fn with_classifier(self, num_classes: usize, device: &B::Device) -> Self {
        let fc = LinearConfig::new(self.fc_in_features, num_classes).init(device);
        Self { fc, ..self }
    }

    /// signals: [batch, channels, width] → logits: [batch, num_classes]
    pub fn forward(&self, signals: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = relu(self.stem_bn.forward(self.stem_conv.forward(signals)));
        let mut x = self.stem_pool.forward(x);

        for stage in &self.stages {
            for block in &stage.blocks {
                x = block.forward(x);
            }
        }

        // [batch, channels, 1] → [batch, channels]
        let x = self.avg_pool.forward(x).flatten::<2>(1, 2);
        self.fc.forward(x)
    }
}
